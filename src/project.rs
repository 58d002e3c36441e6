use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::flatten::Cell;

/// Namespace tags checked against qualified field names, in priority order.
/// The first tag whose `"<tag>."` prefix matches wins.
pub const NAMESPACE_TAGS: [&str; 4] = ["entity", "file", "link", "directory"];

/// Platform-managed metadata keys; crossed with [`NAMESPACE_TAGS`] these form
/// the default reserved-field catalog.
const RESERVED_KEYS: [&str; 15] = [
    "benefactorId",
    "nodeType",
    "concreteType",
    "createdByPrincipalId",
    "createdOn",
    "eTag",
    "id",
    "modifiedOn",
    "modifiedByPrincipalId",
    "noteType",
    "versionLabel",
    "versionComment",
    "versionNumber",
    "parentId",
    "description",
];

/// One structured query record: qualified field name → cell.
pub type QueryRecord = BTreeMap<String, Cell>;

/// One flattened output row: display column name → scalar value.
pub type ProjectedRecord = BTreeMap<String, String>;

pub type ProjectedTable = Vec<ProjectedRecord>;

/// Query results arrive either bare or wrapped in an object whose `results`
/// field holds the record sequence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QueryInput {
    Response { results: Vec<QueryRecord> },
    Records(Vec<QueryRecord>),
}

impl QueryInput {
    fn into_records(self) -> Vec<QueryRecord> {
        match self {
            QueryInput::Response { results } => results,
            QueryInput::Records(records) => records,
        }
    }
}

impl From<Vec<QueryRecord>> for QueryInput {
    fn from(records: Vec<QueryRecord>) -> Self {
        QueryInput::Records(records)
    }
}

/// Default reserved-field catalog: every metadata key under every namespace
/// tag, e.g. `entity.id`, `file.eTag`.
pub fn reserved_fields() -> HashSet<String> {
    NAMESPACE_TAGS
        .iter()
        .flat_map(|tag| RESERVED_KEYS.iter().map(move |key| format!("{tag}.{key}")))
        .collect()
}

fn output_name(field: &str) -> &str {
    for tag in NAMESPACE_TAGS {
        if let Some(stripped) = field.strip_prefix(tag) {
            if let Some(stripped) = stripped.strip_prefix('.') {
                return stripped;
            }
        }
    }
    field
}

/// Project a sequence of query records into a flat display table.
///
/// Reserved fields are dropped, namespace prefixes stripped, and every cell
/// flattened with `delimiter` (see [`Cell::flatten`]). The output schema
/// comes from the first record; later records are assumed to share it. An
/// empty multi-value cell anywhere aborts the whole projection.
pub fn project(
    input: QueryInput,
    reserved: &HashSet<String>,
    delimiter: Option<&str>,
) -> Result<ProjectedTable, Error> {
    let records = input.into_records();
    let first = match records.first() {
        Some(record) => record,
        None => return Ok(Vec::new()),
    };

    let mapping: Vec<(&String, &str)> = first
        .keys()
        .filter(|field| !reserved.contains(*field))
        .map(|field| (field, output_name(field)))
        .collect();
    debug!(
        records = records.len(),
        fields = mapping.len(),
        dropped = first.len() - mapping.len(),
        "projecting query records"
    );

    let mut table = Vec::with_capacity(records.len());
    for record in &records {
        let mut row = ProjectedRecord::new();
        for (field, column) in &mapping {
            if let Some(cell) = record.get(*field) {
                let value = cell.flatten(delimiter).map_err(|err| match err {
                    Error::EmptyMultiValue { .. } => Error::EmptyMultiValue {
                        field: Some((*field).clone()),
                    },
                    other => other,
                })?;
                row.insert(column.to_string(), value);
            }
        }
        table.push(row);
    }
    Ok(table)
}

/// Join every multi-valued cell of a record with `delimiter`, leaving scalars
/// alone. Unlike [`Cell::flatten`] an empty list is fine here and joins to
/// the empty string; annotation rows carry empty lists routinely.
pub fn flatten_record(record: &QueryRecord, delimiter: &str) -> ProjectedRecord {
    record
        .iter()
        .map(|(name, cell)| {
            let value = match cell {
                Cell::Scalar(value) => value.clone(),
                Cell::Multi(values) => values.join(delimiter),
            };
            (name.clone(), value)
        })
        .collect()
}
