//! # Object Store
//!
//! S3-style bucket/object storage used as the remote destination for
//! published documents.
//!
//! The pipeline only talks to the [`ObjectStore`] trait.
//! [`LocalObjectStore`] implements it over a directory tree.

mod backend;
mod bucket;
mod errors;
mod local;
mod versioning;

pub use backend::{ObjectInfo, ObjectStore};
pub use bucket::{bucket_name_for, ensure_bucket, validate_bucket_name, validate_object_name};
pub use errors::{ObjectResult, ObjectStoreError};
pub use local::LocalObjectStore;
pub use versioning::{
    download_to_file, next_versioned_name, versioned_name, OBJECT_EXTENSION,
};
