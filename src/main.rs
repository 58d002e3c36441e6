use anyhow::{bail, Result};
use std::env;
use tabnorm::read::{read_column_table_file, read_row_table_file, DEFAULT_DELIMITER};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => bail!("usage: tabnorm <file> [columns|rows] [delimiter]"),
    };
    let mode = args.next().unwrap_or_else(|| "columns".to_string());
    let delimiter = args
        .next()
        .and_then(|s| s.chars().next())
        .unwrap_or(DEFAULT_DELIMITER);

    match mode.as_str() {
        "columns" => {
            let table = read_column_table_file(&path, delimiter)?;
            info!(
                subjects = table.subjects.len(),
                columns = table.columns.len(),
                "read column table"
            );
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        "rows" => {
            let table = read_row_table_file(&path, delimiter)?;
            info!(subjects = table.len(), "read row table");
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        other => bail!("unknown mode `{}`; expected `columns` or `rows`", other),
    }

    Ok(())
}
