//! # Object Store Trait

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::ObjectResult;

/// Metadata for one stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object name within its bucket, `/`-separated
    pub name: String,
    pub size: u64,
    /// Hex SHA-256 of the content, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub last_modified: DateTime<Utc>,
}

impl ObjectInfo {
    /// Calculate the checksum recorded for uploaded data
    pub fn calculate_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }
}

/// Bucket/object storage in the S3 model
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Check if a bucket exists
    fn bucket_exists(&self, bucket: &str) -> ObjectResult<bool>;

    /// Create a bucket. Fails if it already exists.
    fn make_bucket(&self, bucket: &str) -> ObjectResult<()>;

    /// List every object in a bucket, sorted by name
    fn list_objects(&self, bucket: &str) -> ObjectResult<Vec<ObjectInfo>>;

    /// Store `data` under `object`, replacing any previous content
    fn put_object(&self, bucket: &str, object: &str, data: &[u8]) -> ObjectResult<ObjectInfo>;

    /// Read an object's full content
    fn get_object(&self, bucket: &str, object: &str) -> ObjectResult<Vec<u8>>;
}
