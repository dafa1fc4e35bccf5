use csv::Error as CsvError;
use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    Open { path: PathBuf, source: io::Error },
    Csv(CsvError),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io(err) => write!(f, "I/O error: {}", err),
            ReadError::Open { path, source } => {
                write!(f, "failed to open {}: {}", path.display(), source)
            }
            ReadError::Csv(err) => write!(f, "read error: {}", err),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(err) => Some(err),
            ReadError::Open { source, .. } => Some(source),
            ReadError::Csv(err) => Some(err),
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        ReadError::Io(err)
    }
}

impl From<CsvError> for ReadError {
    fn from(err: CsvError) -> Self {
        ReadError::Csv(err)
    }
}

/// A single non-blank input line, already split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source, blank lines included.
    pub number: u64,
    pub fields: Vec<String>,
}

impl Line {
    pub fn new(number: u64, mut fields: Vec<String>) -> Self {
        trim_trailing_empty(&mut fields);
        Line { number, fields }
    }
}

/// Drops empty fields from the end of a split line.
///
/// `"443,tcp,"` therefore has two fields, not three. Leading and interior
/// empty fields are kept.
pub fn trim_trailing_empty(fields: &mut Vec<String>) {
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
}
