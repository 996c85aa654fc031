//! CLI-specific error types
//!
//! Every error reaching the CLI is fatal for the command: it is printed
//! with its code and the process exits non-zero.

use std::fmt;
use std::io;

use crate::export::ExportError;
use crate::ingest::IngestError;
use crate::object_store::ObjectStoreError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Store could not be opened, read or written
    StoreFailed,
    /// Ingestion failed
    IngestFailed,
    /// Export or publish failed
    ExportFailed,
    /// Object store operation failed
    ObjectStoreFailed,
    /// Key not present in the store
    KeyNotFound,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "STPDB_CLI_CONFIG_ERROR",
            Self::IoError => "STPDB_CLI_IO_ERROR",
            Self::StoreFailed => "STPDB_CLI_STORE_FAILED",
            Self::IngestFailed => "STPDB_CLI_INGEST_FAILED",
            Self::ExportFailed => "STPDB_CLI_EXPORT_FAILED",
            Self::ObjectStoreFailed => "STPDB_CLI_OBJECT_STORE_FAILED",
            Self::KeyNotFound => "STPDB_CLI_KEY_NOT_FOUND",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Key not found
    pub fn key_not_found(key: &str) -> Self {
        Self::new(CliErrorCode::KeyNotFound, format!("No entry for key '{}'", key))
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

// Domain errors keep their own code in the message so the root cause
// stays greppable. StoreError already prints its code.

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreFailed, e.to_string())
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::new(CliErrorCode::IngestFailed, format!("[{}] {}", e.code(), e))
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        Self::new(CliErrorCode::ExportFailed, format!("[{}] {}", e.code(), e))
    }
}

impl From<ObjectStoreError> for CliError {
    fn from(e: ObjectStoreError) -> Self {
        Self::new(CliErrorCode::ObjectStoreFailed, format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::key_not_found("DOC_1");
        assert_eq!(err.to_string(), "STPDB_CLI_KEY_NOT_FOUND: No entry for key 'DOC_1'");
    }

    #[test]
    fn test_object_error_keeps_inner_code() {
        let err: CliError = ObjectStoreError::BucketNotFound("doc".into()).into();
        assert_eq!(err.code(), &CliErrorCode::ObjectStoreFailed);
        assert!(err.message().starts_with("[STPDB_OBJECT_"));
    }
}
