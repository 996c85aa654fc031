//! Export errors

use std::io;

use thiserror::Error;

use crate::object_store::ObjectStoreError;
use crate::store::StoreError;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Export failures. Any of them aborts the export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Reading the prefix from the store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Writing to the local sink failed
    #[error("Export I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Handing the finished document to the object store failed
    #[error("Export transfer failed: {0}")]
    Transfer(#[from] ObjectStoreError),
}

impl ExportError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ExportError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Store(e) => e.code().code(),
            ExportError::Io { .. } => "STPDB_EXPORT_IO_ERROR",
            ExportError::Transfer(_) => "STPDB_EXPORT_TRANSFER_FAILED",
        }
    }
}
