use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A single cell of a structured query record: either one value or a list of
/// them. Deserializes from a JSON string or a JSON array of strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Scalar(String),
    Multi(Vec<String>),
}

impl Cell {
    /// Reduce this cell to one scalar.
    ///
    /// A multi-valued cell is joined with `delimiter` when one is given.
    /// Without a delimiter only the first element survives; the rest are
    /// dropped. Single-value display contexts want exactly that, but it is
    /// lossy, so callers wanting everything must pass a delimiter.
    pub fn flatten(&self, delimiter: Option<&str>) -> Result<String, Error> {
        match self {
            Cell::Scalar(value) => Ok(value.clone()),
            Cell::Multi(values) => match (values.first(), delimiter) {
                (None, _) => Err(Error::EmptyMultiValue { field: None }),
                (Some(_), Some(delimiter)) => Ok(values.join(delimiter)),
                (Some(first), None) => Ok(first.clone()),
            },
        }
    }
}
