//! Batched commit tests
//!
//! Covers:
//! - Batch boundaries as seen by the engine (1000 / 1001 records)
//! - A failed batch leaves earlier batches committed and nothing after it
//! - Ingestion and export never interleave on one store

use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread;

use stpdb::export::{PrefixExporter, Sink};
use stpdb::ingest::{DocumentIngestor, IngestConfig};
use stpdb::parser::Record;
use stpdb::store::{
    KvEngine, MemoryEngine, NamespacedStore, ScanVisitor, StoreErrorCode, StoreResult, StoreError,
    WriteBatch,
};

// =============================================================================
// Test Utilities
// =============================================================================

/// Memory engine that records the size of every batch it is handed and
/// fails the `fail_at`-th one (1-based; 0 never fails)
struct FailingEngine {
    inner: MemoryEngine,
    fail_at: usize,
    batch_sizes: Vec<usize>,
}

impl FailingEngine {
    fn new(fail_at: usize) -> Self {
        Self {
            inner: MemoryEngine::new(),
            fail_at,
            batch_sizes: Vec::new(),
        }
    }

    fn recording() -> Self {
        Self::new(0)
    }
}

impl KvEngine for FailingEngine {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.inner.put(key, value)
    }

    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        self.inner.delete(key)
    }

    fn write_batch(&mut self, batch: &WriteBatch) -> StoreResult<()> {
        self.batch_sizes.push(batch.len());
        if self.batch_sizes.len() == self.fail_at {
            return Err(StoreError::batch_failed("injected batch failure"));
        }
        self.inner.write_batch(batch)
    }

    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> StoreResult<()> {
        self.inner.scan_prefix(prefix, visit)
    }
}

fn numbered_records(count: usize) -> Vec<Record> {
    (1..=count)
        .map(|i| Record::new(i.to_string(), format!("ENTITY({})", i).into_bytes()))
        .collect()
}

// =============================================================================
// Batch boundaries
// =============================================================================

#[test]
fn test_exactly_one_full_batch() {
    let store = NamespacedStore::with_engine(FailingEngine::recording());
    let report = DocumentIngestor::new(&store)
        .ingest("DOC", numbered_records(1000))
        .unwrap();

    assert_eq!(report.batches, 1);
    assert_eq!(store.count_prefix(b"DOC_").unwrap(), 1000);

    // One engine commit of 1000 entries, no trailing flush
    let engine = store.into_engine().unwrap();
    assert_eq!(engine.batch_sizes, vec![1000]);
}

#[test]
fn test_one_over_capacity_flushes_trailing_batch() {
    let store = NamespacedStore::with_engine(FailingEngine::recording());
    let report = DocumentIngestor::new(&store)
        .ingest("DOC", numbered_records(1001))
        .unwrap();

    assert_eq!(report.batches, 2);
    assert_eq!(report.records, 1001);
    assert_eq!(store.get(b"DOC_1001").unwrap(), Some(b"ENTITY(1001)".to_vec()));

    let engine = store.into_engine().unwrap();
    assert_eq!(engine.batch_sizes, vec![1000, 1]);
}

#[test]
fn test_custom_capacity_splits_in_order() {
    let store = NamespacedStore::with_engine(FailingEngine::recording());
    DocumentIngestor::with_config(&store, IngestConfig::with_batch_capacity(4))
        .unwrap()
        .ingest("DOC", numbered_records(10))
        .unwrap();

    let engine = store.into_engine().unwrap();
    assert_eq!(engine.batch_sizes, vec![4, 4, 2]);
}

#[test]
fn test_empty_input_commits_nothing() {
    let store = NamespacedStore::with_engine(FailingEngine::recording());
    let report = DocumentIngestor::new(&store).ingest("DOC", Vec::new()).unwrap();

    assert_eq!(report.batches, 0);
    assert!(store.into_engine().unwrap().batch_sizes.is_empty());
}

// =============================================================================
// Partial failure
// =============================================================================

#[test]
fn test_failed_batch_keeps_earlier_batches() {
    let store = NamespacedStore::with_engine(FailingEngine::new(2));
    let ingestor =
        DocumentIngestor::with_config(&store, IngestConfig::with_batch_capacity(10)).unwrap();

    let err = ingestor.ingest("DOC", numbered_records(35)).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::BatchFailed);

    // Batch 1 (records 1..=10) committed; batch 2 failed; nothing later ran
    assert_eq!(store.count_prefix(b"DOC_").unwrap(), 10);
    assert!(store.get(b"DOC_10").unwrap().is_some());
    assert!(store.get(b"DOC_11").unwrap().is_none());
    assert!(store.get(b"DOC_35").unwrap().is_none());

    let engine = store.into_engine().unwrap();
    assert_eq!(engine.batch_sizes, vec![10, 10]);
}

#[test]
fn test_failed_first_batch_writes_nothing() {
    let store = NamespacedStore::with_engine(FailingEngine::new(1));
    let result = DocumentIngestor::new(&store).ingest("DOC", numbered_records(5));

    assert!(result.is_err());
    assert_eq!(store.count_prefix(b"DOC").unwrap(), 0);
}

// =============================================================================
// Ingest / export exclusion
// =============================================================================

#[test]
fn test_export_sees_whole_batches_only() {
    let store = Arc::new(NamespacedStore::with_engine(MemoryEngine::new()));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let ingestor =
                DocumentIngestor::with_config(&*store, IngestConfig::with_batch_capacity(100))
                    .unwrap();
            ingestor.ingest("DOC", numbered_records(2000)).unwrap();
        })
    };

    for _ in 0..20 {
        let mut out = Vec::new();
        let report = PrefixExporter::new(&*store)
            .export("DOC", Sink::writer(&mut out))
            .unwrap();
        assert_eq!(report.records % 100, 0);
    }

    writer.join().unwrap();
    assert_eq!(store.count_prefix(b"DOC_").unwrap(), 2000);
}

#[test]
fn test_scan_can_stop_early() {
    let mut engine = MemoryEngine::new();
    engine.put(b"DOC_1", b"A").unwrap();
    engine.put(b"DOC_2", b"B").unwrap();

    let mut seen = 0;
    engine
        .scan_prefix(b"DOC", &mut |_, _| {
            seen += 1;
            ControlFlow::Break(())
        })
        .unwrap();
    assert_eq!(seen, 1);
}
