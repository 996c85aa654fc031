//! Versioned publishing
//!
//! Puts the exporter together with the object store: make sure the
//! bucket exists, pick the next `<prefix>_v<N>.stp` name, and export the
//! document under that name.

use crate::object_store::{ensure_bucket, next_versioned_name, ObjectStore};
use crate::store::KvEngine;

use super::errors::ExportResult;
use super::exporter::{ExportReport, PrefixExporter};
use super::sink::Sink;

/// Outcome of [`publish_versioned`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub bucket: String,
    pub object: String,
    /// Whether the bucket was created by this publish
    pub bucket_created: bool,
    pub export: ExportReport,
}

/// Exports `prefix` as a new versioned object in `bucket`.
pub fn publish_versioned<E: KvEngine>(
    exporter: &PrefixExporter<'_, E>,
    objects: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> ExportResult<PublishReport> {
    let bucket_created = ensure_bucket(objects, bucket)?;
    let object = next_versioned_name(objects, bucket, prefix)?;

    let export = exporter.export(prefix, Sink::object(objects, bucket, object.as_str()))?;

    Ok(PublishReport {
        bucket: bucket.to_string(),
        object,
        bucket_created,
        export,
    })
}
