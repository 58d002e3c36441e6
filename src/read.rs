use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Error;
use crate::normalize::strip_quotes;

/// Files are tab-separated unless the caller says otherwise.
pub const DEFAULT_DELIMITER: char = '\t';

/// Column-oriented table: one value vector per column, index-aligned with
/// `subjects`. The key column (position 0 of the header) lives in `subjects`
/// and is not repeated in `columns`.
#[derive(Debug, Serialize)]
pub struct ColumnTable {
    pub subjects: Vec<String>,
    pub columns: BTreeMap<String, Vec<String>>,
}

/// Row-oriented table: subject key → column name → value.
pub type RowTable = BTreeMap<String, BTreeMap<String, String>>;

/// Split a header line on `delimiter` and strip quotes from every name.
/// Position 0 is the key column.
pub fn parse_header(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|name| strip_quotes(name).to_string())
        .collect()
}

fn split_row<'a>(
    line: &'a str,
    line_no: usize,
    delimiter: char,
    header_len: usize,
) -> Result<Vec<&'a str>, Error> {
    let fields: Vec<&str> = line.split(delimiter).collect();
    if fields.len() < header_len {
        return Err(Error::MalformedRow {
            line: line_no,
            expected: header_len,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// Read a delimited file into a [`ColumnTable`].
///
/// The first line is the header; every later line is one row. Rows shorter
/// than the header abort the read. All values stay strings.
#[instrument(level = "debug", skip(source))]
pub fn read_column_table<R: BufRead>(source: R, delimiter: char) -> Result<ColumnTable, Error> {
    let mut lines = source.lines();
    let header = match lines.next() {
        Some(line) => parse_header(&line?, delimiter),
        None => return Err(Error::EmptyInput),
    };

    let mut subjects = Vec::new();
    let mut columns: BTreeMap<String, Vec<String>> = header[1..]
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();

    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields = split_row(&line, idx + 2, delimiter, header.len())?;

        subjects.push(strip_quotes(fields[0]).to_string());
        for (i, name) in header.iter().enumerate().skip(1) {
            columns
                .get_mut(name)
                .expect("every header name has a column")
                .push(strip_quotes(fields[i]).to_string());
        }
    }

    debug!(
        subjects = subjects.len(),
        columns = columns.len(),
        "read column table"
    );
    Ok(ColumnTable { subjects, columns })
}

/// Read a delimited file into a [`RowTable`].
///
/// Same parsing as [`read_column_table`], keyed by subject instead. A subject
/// key appearing twice keeps only the later row.
#[instrument(level = "debug", skip(source))]
pub fn read_row_table<R: BufRead>(source: R, delimiter: char) -> Result<RowTable, Error> {
    let mut lines = source.lines();
    let header = match lines.next() {
        Some(line) => parse_header(&line?, delimiter),
        None => return Err(Error::EmptyInput),
    };

    let mut table = RowTable::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields = split_row(&line, idx + 2, delimiter, header.len())?;

        let subject = strip_quotes(fields[0]).to_string();
        let mut row = BTreeMap::new();
        for (i, name) in header.iter().enumerate().skip(1) {
            row.insert(name.clone(), strip_quotes(fields[i]).to_string());
        }
        table.insert(subject, row);
    }

    debug!(subjects = table.len(), "read row table");
    Ok(table)
}

#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_column_table_file<P: AsRef<Path>>(
    path: P,
    delimiter: char,
) -> anyhow::Result<ColumnTable> {
    let file = File::open(&path)
        .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
    read_column_table(BufReader::new(file), delimiter)
        .with_context(|| format!("reading {}", path.as_ref().display()))
}

#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_row_table_file<P: AsRef<Path>>(path: P, delimiter: char) -> anyhow::Result<RowTable> {
    let file = File::open(&path)
        .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
    read_row_table(BufReader::new(file), delimiter)
        .with_context(|| format!("reading {}", path.as_ref().display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,tabnorm=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const FIXTURE: &str = "id\tage\tgender\nA\t30\tM\nB\t40\tF\n";

    #[test]
    fn column_table_from_tab_file() -> Result<(), Error> {
        init_test_logging();
        let table = read_column_table(Cursor::new(FIXTURE), DEFAULT_DELIMITER)?;

        assert_eq!(table.subjects, vec!["A", "B"]);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns["age"], vec!["30", "40"]);
        assert_eq!(table.columns["gender"], vec!["M", "F"]);
        Ok(())
    }

    #[test]
    fn row_table_from_tab_file() -> Result<(), Error> {
        init_test_logging();
        let table = read_row_table(Cursor::new(FIXTURE), DEFAULT_DELIMITER)?;

        assert_eq!(table.len(), 2);
        assert_eq!(table["A"]["age"], "30");
        assert_eq!(table["A"]["gender"], "M");
        assert_eq!(table["B"]["age"], "40");
        assert_eq!(table["B"]["gender"], "F");
        Ok(())
    }

    #[test]
    fn quotes_stripped_from_header_and_data() -> Result<(), Error> {
        let input = "\"id\"\t\"age\"\n\"A\"\t\"30\"\n";
        let table = read_column_table(Cursor::new(input), DEFAULT_DELIMITER)?;

        assert_eq!(table.subjects, vec!["A"]);
        assert_eq!(table.columns["age"], vec!["30"]);
        Ok(())
    }

    #[test]
    fn comma_delimiter_override() -> Result<(), Error> {
        let input = "id,age\nA,30\n";
        let table = read_column_table(Cursor::new(input), ',')?;
        assert_eq!(table.columns["age"], vec!["30"]);
        Ok(())
    }

    #[test]
    fn empty_stream_is_rejected() {
        let err = read_column_table(Cursor::new(""), DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));

        let err = read_row_table(Cursor::new(""), DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn short_row_is_rejected() {
        let input = "id\tage\tgender\nA\t30\n";
        let err = read_column_table(Cursor::new(input), DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRow {
                line: 2,
                expected: 3,
                found: 2,
            }
        ));
    }

    #[test]
    fn wrong_delimiter_reads_as_malformed() {
        // Comma-separated content split on tab collapses to one field per row.
        let input = "id,age\nA,30\n";
        let err = read_column_table(Cursor::new(input), DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { found: 1, .. }));
    }

    #[test]
    fn extra_fields_beyond_header_are_ignored() -> Result<(), Error> {
        let input = "id\tage\nA\t30\tstray\n";
        let table = read_column_table(Cursor::new(input), DEFAULT_DELIMITER)?;
        assert_eq!(table.columns["age"], vec!["30"]);
        Ok(())
    }

    #[test]
    fn duplicate_subject_keeps_later_row() -> Result<(), Error> {
        // Last write wins. Pinned here so a change in overwrite semantics
        // shows up as a test failure, not a silent data difference.
        let input = "id\tage\nA\t30\nA\t99\n";
        let table = read_row_table(Cursor::new(input), DEFAULT_DELIMITER)?;

        assert_eq!(table.len(), 1);
        assert_eq!(table["A"]["age"], "99");
        Ok(())
    }

    #[test]
    fn blank_trailing_line_is_skipped() -> Result<(), Error> {
        let input = "id\tage\nA\t30\n\n";
        let table = read_column_table(Cursor::new(input), DEFAULT_DELIMITER)?;
        assert_eq!(table.subjects, vec!["A"]);
        Ok(())
    }

    #[test]
    fn file_wrappers_read_from_disk() -> anyhow::Result<()> {
        init_test_logging();
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(FIXTURE.as_bytes())?;

        let table = read_column_table_file(tmp.path(), DEFAULT_DELIMITER)?;
        assert_eq!(table.subjects, vec!["A", "B"]);

        let rows = read_row_table_file(tmp.path(), DEFAULT_DELIMITER)?;
        assert_eq!(rows["B"]["gender"], "F");
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_column_table_file("/no/such/file.tsv", DEFAULT_DELIMITER).unwrap_err();
        assert!(err.to_string().contains("/no/such/file.tsv"));
    }
}
