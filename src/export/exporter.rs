//! Prefix exporter
//!
//! Rebuilds a document from every stored entry under a prefix. Each
//! entry `<prefix>_<id> -> value` becomes the line `#<id>=<value>;`.
//! Lines come out in the store's key order, which is byte order: ids
//! `10` and `2` come out as `10` before `2`, so line order matches the
//! original file only when ids have a fixed width.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::object_store::ObjectStore;
use crate::observability::{log_event_with_fields, Event, ObservationScope, Operation};
use crate::parser::write_record_line;
use crate::store::{split_id, KvEngine, NamespacedStore};

use super::errors::{ExportError, ExportResult};
use super::sink::Sink;

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub prefix: String,
    /// Lines written
    pub records: usize,
    /// Entries under the prefix that had no `_<id>` suffix
    pub skipped: usize,
    pub bytes: u64,
    pub destination: String,
}

/// Exports namespaced entries back into STEP record lines.
///
/// The id is whatever follows `<prefix>_`. The scan itself matches raw
/// key bytes, so exporting `DOC` also visits `DOCX_1`; such entries do
/// not belong to the document and are skipped on purpose, counted in
/// [`ExportReport::skipped`], instead of being cut after `len(prefix) + 1`
/// bytes and written out under the foreign id `_1`.
#[derive(Debug)]
pub struct PrefixExporter<'s, E: KvEngine> {
    store: &'s NamespacedStore<E>,
}

#[derive(Debug, Default)]
struct Written {
    records: usize,
    skipped: usize,
    bytes: u64,
}

impl<'s, E: KvEngine> PrefixExporter<'s, E> {
    pub fn new(store: &'s NamespacedStore<E>) -> Self {
        Self { store }
    }

    /// Writes every record under `prefix` to `sink`.
    ///
    /// The store's read lock is held for the whole scan, so ingestion
    /// into the same store waits until the records have been written
    /// out (for remote sinks, until they are buffered; the upload
    /// itself runs after the lock is released).
    ///
    /// # Errors
    ///
    /// A store read failure, a sink write failure or an upload failure
    /// aborts the export. A local destination file is only replaced when
    /// the export succeeds.
    pub fn export(&self, prefix: &str, sink: Sink<'_>) -> ExportResult<ExportReport> {
        let destination = sink.describe();
        let scope = ObservationScope::with_fields(
            Operation::Export,
            &[("prefix", prefix), ("destination", destination.as_str())],
        );

        let result = match sink {
            Sink::Local(path) => self.export_to_file(prefix, &path),
            Sink::Object {
                store,
                bucket,
                object,
            } => self.export_to_object(prefix, store, &bucket, &object),
            Sink::Writer(writer) => self.write_records(prefix, writer),
        };

        match result {
            Ok(written) => {
                scope.complete_with_fields(&[
                    ("records", &written.records.to_string()),
                    ("bytes", &written.bytes.to_string()),
                ]);
                Ok(ExportReport {
                    prefix: prefix.to_string(),
                    records: written.records,
                    skipped: written.skipped,
                    bytes: written.bytes,
                    destination,
                })
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Streams `#id=value;` lines for `prefix` into `writer`.
    fn write_records<W: Write + ?Sized>(&self, prefix: &str, writer: &mut W) -> ExportResult<Written> {
        let prefix_bytes = prefix.as_bytes();
        let mut written = Written::default();

        self.store.scan_prefix(prefix_bytes, |key, value| -> ExportResult<()> {
            let Some(id) = split_id(key, prefix_bytes) else {
                written.skipped += 1;
                return Ok(());
            };

            write_record_line(writer, id, value).map_err(|e| {
                ExportError::io(
                    format!("write record {}", String::from_utf8_lossy(key)),
                    e,
                )
            })?;
            written.records += 1;
            written.bytes += (id.len() + value.len() + 4) as u64;
            Ok(())
        })?;

        writer.flush().map_err(|e| ExportError::io("flush", e))?;
        Ok(written)
    }

    fn export_to_file(&self, prefix: &str, path: &Path) -> ExportResult<Written> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .map_err(|e| ExportError::io(format!("create {}", parent.display()), e))?;

        // Dropped (and deleted) on any early return
        let mut temp = tempfile::Builder::new()
            .prefix(".stpdb-export-")
            .tempfile_in(parent)
            .map_err(|e| ExportError::io(format!("create temp file in {}", parent.display()), e))?;

        let written = {
            let mut writer = BufWriter::new(&mut temp);
            self.write_records(prefix, &mut writer)?
        };

        temp.as_file()
            .sync_all()
            .map_err(|e| ExportError::io(format!("sync {}", path.display()), e))?;
        temp.persist(path)
            .map_err(|e| ExportError::io(format!("rename to {}", path.display()), e.error))?;

        Ok(written)
    }

    fn export_to_object(
        &self,
        prefix: &str,
        store: &dyn ObjectStore,
        bucket: &str,
        object: &str,
    ) -> ExportResult<Written> {
        let mut buffer = Vec::new();
        let written = self.write_records(prefix, &mut buffer)?;

        let info = store.put_object(bucket, object, &buffer)?;
        log_event_with_fields(
            Event::ObjectUploaded,
            &[
                ("bucket", bucket),
                ("object", object),
                ("bytes", &info.size.to_string()),
                ("checksum", info.checksum.as_deref().unwrap_or("")),
            ],
        );
        Ok(written)
    }
}
