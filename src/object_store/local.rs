//! # Local Filesystem Object Store
//!
//! Layout: `<root>/<bucket>/<object>`. Object names containing `/` map to
//! subdirectories. Objects are written to a temp file in the target
//! directory and renamed into place, so readers never see partial content.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::backend::{ObjectInfo, ObjectStore};
use super::bucket::{validate_bucket_name, validate_object_name};
use super::errors::{ObjectResult, ObjectStoreError};

/// Prefix of in-flight upload files; excluded from listings
const UPLOAD_TEMP_PREFIX: &str = ".stpdb-upload-";

/// Directory-backed object store
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first bucket creation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> ObjectResult<PathBuf> {
        validate_bucket_name(bucket)?;
        Ok(self.root.join(bucket))
    }

    fn existing_bucket_path(&self, bucket: &str) -> ObjectResult<PathBuf> {
        let path = self.bucket_path(bucket)?;
        if !path.is_dir() {
            return Err(ObjectStoreError::BucketNotFound(bucket.to_string()));
        }
        Ok(path)
    }

    fn object_path(&self, bucket: &str, object: &str) -> ObjectResult<PathBuf> {
        let bucket_path = self.existing_bucket_path(bucket)?;
        validate_object_name(object)?;
        Ok(object.split('/').fold(bucket_path, |path, segment| path.join(segment)))
    }

    fn collect_objects(
        dir: &Path,
        prefix: &str,
        out: &mut Vec<ObjectInfo>,
    ) -> ObjectResult<()> {
        let entries = fs::read_dir(dir)
            .map_err(|e| ObjectStoreError::io(format!("list {}", dir.display()), e))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| ObjectStoreError::io(format!("list {}", dir.display()), e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with(UPLOAD_TEMP_PREFIX) {
                continue;
            }

            let name = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{}/{}", prefix, file_name)
            };
            let metadata = entry
                .metadata()
                .map_err(|e| ObjectStoreError::io(format!("stat {}", name), e))?;

            if metadata.is_dir() {
                Self::collect_objects(&entry.path(), &name, out)?;
            } else {
                let last_modified = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                out.push(ObjectInfo {
                    name,
                    size: metadata.len(),
                    checksum: None,
                    last_modified,
                });
            }
        }
        Ok(())
    }
}

/// Write `data` to `path` through a temp file in the same directory,
/// creating parent directories as needed.
pub(crate) fn persist_bytes(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::Builder::new()
        .prefix(UPLOAD_TEMP_PREFIX)
        .tempfile_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl ObjectStore for LocalObjectStore {
    fn bucket_exists(&self, bucket: &str) -> ObjectResult<bool> {
        Ok(self.bucket_path(bucket)?.is_dir())
    }

    fn make_bucket(&self, bucket: &str) -> ObjectResult<()> {
        let path = self.bucket_path(bucket)?;
        fs::create_dir_all(&self.root)
            .map_err(|e| ObjectStoreError::io(format!("create {}", self.root.display()), e))?;

        fs::create_dir(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                ObjectStoreError::BucketAlreadyExists(bucket.to_string())
            } else {
                ObjectStoreError::io(format!("create bucket {}", bucket), e)
            }
        })
    }

    fn list_objects(&self, bucket: &str) -> ObjectResult<Vec<ObjectInfo>> {
        let path = self.existing_bucket_path(bucket)?;
        let mut objects = Vec::new();
        Self::collect_objects(&path, "", &mut objects)?;
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    fn put_object(&self, bucket: &str, object: &str, data: &[u8]) -> ObjectResult<ObjectInfo> {
        let path = self.object_path(bucket, object)?;
        persist_bytes(&path, data)
            .map_err(|e| ObjectStoreError::io(format!("put {}/{}", bucket, object), e))?;

        Ok(ObjectInfo {
            name: object.to_string(),
            size: data.len() as u64,
            checksum: Some(ObjectInfo::calculate_checksum(data)),
            last_modified: Utc::now(),
        })
    }

    fn get_object(&self, bucket: &str, object: &str) -> ObjectResult<Vec<u8>> {
        let path = self.object_path(bucket, object)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ObjectStoreError::ObjectNotFound {
                    bucket: bucket.to_string(),
                    object: object.to_string(),
                }
            } else {
                ObjectStoreError::io(format!("get {}/{}", bucket, object), e)
            }
        })
    }
}
