//! Document ingestion
//!
//! Parses a STEP document and stores its records under the document's
//! namespace, `WriteBatch` by `WriteBatch`.
//!
//! # Atomicity
//!
//! Each batch commits atomically, the document as a whole does not. If a
//! batch fails, every batch flushed before it stays committed and nothing
//! from the failing batch onward is written. The error is returned to the
//! caller; nothing is retried or swallowed.

mod errors;

pub use errors::{IngestError, IngestResult};

use std::io::BufRead;
use std::path::Path;

use crate::observability::{trace_event, Event, ObservationScope, Operation};
use crate::parser::{ParseStats, Record, RecordParser};
use crate::store::{
    KvEngine, NamespacedStore, StorageKey, StoreResult, WriteBatch, DEFAULT_BATCH_CAPACITY,
};

/// Ingestion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Entries per atomic batch
    pub batch_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
        }
    }
}

impl IngestConfig {
    pub fn with_batch_capacity(batch_capacity: usize) -> Self {
        Self { batch_capacity }
    }

    pub fn validate(&self) -> IngestResult<()> {
        if self.batch_capacity == 0 {
            return Err(IngestError::InvalidConfig(
                "batch_capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a successful ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub namespace: String,
    /// Records written
    pub records: usize,
    /// Batches committed
    pub batches: usize,
    /// Parser counters, when the input was parsed by the ingestor
    pub parse: Option<ParseStats>,
}

/// Derives a document namespace from its file name: the last path
/// component with its extension stripped.
///
/// `/data/1000410-28L.stp` becomes `1000410-28L`.
pub fn namespace_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Stores parsed documents into a [`NamespacedStore`].
#[derive(Debug)]
pub struct DocumentIngestor<'s, E: KvEngine> {
    store: &'s NamespacedStore<E>,
    config: IngestConfig,
}

impl<'s, E: KvEngine> DocumentIngestor<'s, E> {
    /// Ingestor with the default batch capacity of 1000.
    pub fn new(store: &'s NamespacedStore<E>) -> Self {
        Self {
            store,
            config: IngestConfig::default(),
        }
    }

    pub fn with_config(store: &'s NamespacedStore<E>, config: IngestConfig) -> IngestResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> IngestConfig {
        self.config
    }

    /// Writes `records` under `namespace`, in order.
    ///
    /// Records are keyed `namespace_id` and grouped into batches of
    /// `batch_capacity`; a trailing partial batch is flushed once the
    /// input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` from a batch flush. Earlier batches
    /// remain committed.
    pub fn ingest<I>(&self, namespace: &str, records: I) -> StoreResult<IngestReport>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut batch = WriteBatch::with_capacity(self.config.batch_capacity);
        let mut report = IngestReport {
            namespace: namespace.to_string(),
            records: 0,
            batches: 0,
            parse: None,
        };

        for record in records {
            batch.push(StorageKey::compose(namespace, &record.id), record.definition);
            if batch.is_full() {
                self.flush(namespace, &mut batch, &mut report)?;
            }
        }

        if !batch.is_empty() {
            self.flush(namespace, &mut batch, &mut report)?;
        }

        Ok(report)
    }

    fn flush(
        &self,
        namespace: &str,
        batch: &mut WriteBatch,
        report: &mut IngestReport,
    ) -> StoreResult<()> {
        self.store.write_batch(batch)?;

        report.batches += 1;
        report.records += batch.len();
        trace_event(
            Event::BatchFlushed,
            &[
                ("namespace", namespace),
                ("batch", &report.batches.to_string()),
                ("entries", &batch.len().to_string()),
            ],
        );

        batch.clear();
        Ok(())
    }

    /// Parses `reader` in full, then ingests its records under `namespace`.
    pub fn ingest_reader<R: BufRead>(&self, namespace: &str, reader: R) -> IngestResult<IngestReport> {
        if namespace.is_empty() {
            return Err(IngestError::InvalidNamespace(namespace.to_string()));
        }

        let scope = ObservationScope::with_fields(Operation::Ingest, &[("namespace", namespace)]);
        let (records, stats) = match RecordParser::new().parse_with_stats(reader) {
            Ok(parsed) => parsed,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
        };

        self.finish(scope, namespace, records, stats)
    }

    /// Ingests the STEP file at `path` under the namespace derived from
    /// its file name.
    pub fn ingest_file(&self, path: &Path) -> IngestResult<IngestReport> {
        let namespace = namespace_from_path(path)
            .ok_or_else(|| IngestError::InvalidNamespace(path.display().to_string()))?;

        let scope = ObservationScope::with_fields(
            Operation::Ingest,
            &[
                ("namespace", namespace.as_str()),
                ("path", &path.display().to_string()),
            ],
        );
        let (records, stats) = match RecordParser::new().parse_file(path) {
            Ok(parsed) => parsed,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
        };

        self.finish(scope, &namespace, records, stats)
    }

    fn finish(
        &self,
        scope: ObservationScope<'_>,
        namespace: &str,
        records: Vec<Record>,
        stats: ParseStats,
    ) -> IngestResult<IngestReport> {
        match self.ingest(namespace, records) {
            Ok(mut report) => {
                scope.complete_with_fields(&[
                    ("records", &report.records.to_string()),
                    ("batches", &report.batches.to_string()),
                    ("skipped_lines", &stats.skipped.to_string()),
                ]);
                report.parse = Some(stats);
                Ok(report)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e.into())
            }
        }
    }
}
