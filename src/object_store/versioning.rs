//! # Versioned Object Names
//!
//! Each publish of a document gets a fresh object named
//! `<prefix>_v<N>.stp`, where `N` is one more than the number of objects
//! already in the bucket. The counter is derived from a listing, not
//! stored anywhere, so two concurrent publishers can pick the same name;
//! the later upload wins.

use std::path::Path;

use super::backend::ObjectStore;
use super::errors::{ObjectResult, ObjectStoreError};
use super::local::persist_bytes;
use crate::observability::{log_event_with_fields, Event};

/// File extension of published documents
pub const OBJECT_EXTENSION: &str = "stp";

/// `<prefix>_v<version>.stp`
pub fn versioned_name(prefix: &str, version: usize) -> String {
    format!("{}_v{}.{}", prefix, version, OBJECT_EXTENSION)
}

/// Name for the next version of `prefix` in `bucket`.
pub fn next_versioned_name(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> ObjectResult<String> {
    let existing = store.list_objects(bucket)?.len();
    Ok(versioned_name(prefix, existing + 1))
}

/// Download `object` from `bucket` into the local file `path`.
///
/// The file is replaced atomically; on failure any previous content at
/// `path` is left untouched. Returns the number of bytes written.
pub fn download_to_file(
    store: &dyn ObjectStore,
    bucket: &str,
    object: &str,
    path: &Path,
) -> ObjectResult<u64> {
    let data = store.get_object(bucket, object)?;
    persist_bytes(path, &data)
        .map_err(|e| ObjectStoreError::io(format!("write {}", path.display()), e))?;

    let size = data.len() as u64;
    log_event_with_fields(
        Event::ObjectDownloaded,
        &[
            ("bucket", bucket),
            ("object", object),
            ("path", &path.display().to_string()),
            ("bytes", &size.to_string()),
        ],
    );
    Ok(size)
}
