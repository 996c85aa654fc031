//! Store error types
//!
//! Error codes:
//! - STPDB_STORE_OPEN_FAILED
//! - STPDB_STORE_READ_FAILED
//! - STPDB_STORE_WRITE_FAILED
//! - STPDB_STORE_BATCH_FAILED
//! - STPDB_STORE_ITERATE_FAILED
//! - STPDB_STORE_LOCK_POISONED
//!
//! A missing key is not an error; `get` returns `None` for it.

use std::error::Error as StdError;
use std::fmt;

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Engine could not be opened or closed
    OpenFailed,
    /// Point lookup failed
    ReadFailed,
    /// Single put or delete failed
    WriteFailed,
    /// Atomic batch commit failed
    BatchFailed,
    /// Prefix iteration failed
    IterateFailed,
    /// Store lock was poisoned by a panicking holder
    LockPoisoned,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::OpenFailed => "STPDB_STORE_OPEN_FAILED",
            StoreErrorCode::ReadFailed => "STPDB_STORE_READ_FAILED",
            StoreErrorCode::WriteFailed => "STPDB_STORE_WRITE_FAILED",
            StoreErrorCode::BatchFailed => "STPDB_STORE_BATCH_FAILED",
            StoreErrorCode::IterateFailed => "STPDB_STORE_ITERATE_FAILED",
            StoreErrorCode::LockPoisoned => "STPDB_STORE_LOCK_POISONED",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with operation context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    /// Key or prefix the failing operation was addressing
    details: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    pub fn open_failed(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::OpenFailed, message)
    }

    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::ReadFailed, message)
    }

    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::WriteFailed, message)
    }

    pub fn batch_failed(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::BatchFailed, message)
    }

    pub fn iterate_failed(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::IterateFailed, message)
    }

    pub fn lock_poisoned() -> Self {
        Self::new(StoreErrorCode::LockPoisoned, "Store lock poisoned")
    }

    /// Attach the key the operation was addressing
    pub fn with_key(mut self, key: &[u8]) -> Self {
        self.details = Some(format!("key: {}", String::from_utf8_lossy(key)));
        self
    }

    /// Attach the prefix the operation was addressing
    pub fn with_prefix(mut self, prefix: &[u8]) -> Self {
        self.details = Some(format!("prefix: {}", String::from_utf8_lossy(prefix)));
        self
    }

    /// Attach free-form context
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach the underlying engine error
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreErrorCode::OpenFailed.code(), "STPDB_STORE_OPEN_FAILED");
        assert_eq!(StoreErrorCode::BatchFailed.code(), "STPDB_STORE_BATCH_FAILED");
        assert_eq!(StoreErrorCode::LockPoisoned.code(), "STPDB_STORE_LOCK_POISONED");
    }

    #[test]
    fn test_display_includes_context() {
        let err = StoreError::batch_failed("commit failed")
            .with_key(b"DOC_42")
            .with_source(io::Error::new(io::ErrorKind::Other, "disk full"));
        let display = err.to_string();
        assert!(display.contains("STPDB_STORE_BATCH_FAILED"));
        assert!(display.contains("commit failed"));
        assert!(display.contains("key: DOC_42"));
        assert!(display.contains("disk full"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_prefix_details() {
        let err = StoreError::iterate_failed("scan aborted").with_prefix(b"DOC");
        assert_eq!(err.details(), Some("prefix: DOC"));
        assert_eq!(err.code(), StoreErrorCode::IterateFailed);
    }
}
