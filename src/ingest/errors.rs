//! Ingestion errors

use thiserror::Error;

use crate::parser::ParseError;
use crate::store::StoreError;

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors from the file- and reader-level ingestion entry points
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid namespace: '{0}'")]
    InvalidNamespace(String),

    #[error("Invalid ingest config: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Parse(e) => e.code(),
            IngestError::Store(e) => e.code().code(),
            IngestError::InvalidNamespace(_) => "STPDB_INGEST_INVALID_NAMESPACE",
            IngestError::InvalidConfig(_) => "STPDB_INGEST_INVALID_CONFIG",
        }
    }
}
