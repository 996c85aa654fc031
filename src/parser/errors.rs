//! Parser error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parser errors
///
/// Malformed lines are never errors; only failures to read the input are.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Open { .. } => "STPDB_PARSE_OPEN_FAILED",
            ParseError::Read { .. } => "STPDB_PARSE_READ_FAILED",
        }
    }
}
