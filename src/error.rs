use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Failures raised while reading delimited files or projecting query results.
#[derive(Debug)]
pub enum Error {
    /// The input stream had no header line.
    EmptyInput,
    /// A data row carried fewer fields than the header. Usually a delimiter
    /// mismatch. `line` is 1-based, counting the header as line 1.
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A multi-valued cell was empty, so there is nothing to flatten.
    EmptyMultiValue { field: Option<String> },
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "input has no header line"),
            Error::MalformedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "row at line {} has {} fields, header has {} (delimiter mismatch?)",
                line, found, expected
            ),
            Error::EmptyMultiValue { field } => {
                write!(f, "cannot flatten empty multi-value cell")?;
                if let Some(field) = field {
                    write!(f, " in field `{}`", field)?;
                }
                Ok(())
            }
            Error::Io(err) => write!(f, "read failed: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
