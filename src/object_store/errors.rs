//! # Object Store Errors

use std::io;

use thiserror::Error;

/// Result type for object store operations
pub type ObjectResult<T> = Result<T, ObjectStoreError>;

/// Object store errors
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    // Bucket errors
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Bucket already exists: {0}")]
    BucketAlreadyExists(String),

    #[error("Invalid bucket name '{name}': {reason}")]
    InvalidBucketName { name: String, reason: &'static str },

    // Object errors
    #[error("Object not found: {bucket}/{object}")]
    ObjectNotFound { bucket: String, object: String },

    #[error("Invalid object name: '{0}'")]
    InvalidObjectName(String),

    // I/O errors
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ObjectStoreError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ObjectStoreError::Io {
            context: context.into(),
            source,
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ObjectStoreError::BucketNotFound(_) => "STPDB_OBJECT_BUCKET_NOT_FOUND",
            ObjectStoreError::BucketAlreadyExists(_) => "STPDB_OBJECT_BUCKET_EXISTS",
            ObjectStoreError::InvalidBucketName { .. } => "STPDB_OBJECT_INVALID_BUCKET",
            ObjectStoreError::ObjectNotFound { .. } => "STPDB_OBJECT_NOT_FOUND",
            ObjectStoreError::InvalidObjectName(_) => "STPDB_OBJECT_INVALID_NAME",
            ObjectStoreError::Io { .. } => "STPDB_OBJECT_IO_ERROR",
        }
    }
}
