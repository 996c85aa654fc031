//! Namespaced store
//!
//! Wraps a [`KvEngine`] behind a single reader/writer lock owned by the
//! store instance:
//!
//! - `put`, `delete`, `write_batch` and `close` take the write lock
//! - `get` and `scan_prefix` take the read lock
//!
//! Reads may run concurrently with each other, never with a mutation.
//! The lock covers the whole store, so an export in progress blocks any
//! ingestion into the same store until it finishes, even for an
//! unrelated namespace.

use std::ops::ControlFlow;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::batch::WriteBatch;
use super::engine::KvEngine;
use super::errors::{StoreError, StoreResult};
use super::key::{StorageEntry, StorageKey};
use super::redb_engine::RedbEngine;

/// Durable, lock-guarded key-value store addressed by namespaced keys.
#[derive(Debug)]
pub struct NamespacedStore<E: KvEngine = RedbEngine> {
    engine: RwLock<E>,
}

impl NamespacedStore<RedbEngine> {
    /// Opens or creates the on-disk store at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self::with_engine(RedbEngine::open(path)?))
    }
}

impl<E: KvEngine> NamespacedStore<E> {
    /// Wraps an already-open engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine: RwLock::new(engine),
        }
    }

    /// Closes the store, waiting for in-flight operations to finish.
    pub fn close(self) -> StoreResult<()> {
        let engine = self
            .engine
            .into_inner()
            .map_err(|_| StoreError::lock_poisoned())?;
        drop(engine);
        Ok(())
    }

    /// Consumes the store and hands back its engine.
    pub fn into_engine(self) -> StoreResult<E> {
        self.engine
            .into_inner()
            .map_err(|_| StoreError::lock_poisoned())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, E>> {
        self.engine.read().map_err(|_| StoreError::lock_poisoned())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, E>> {
        self.engine.write().map_err(|_| StoreError::lock_poisoned())
    }

    /// Stores a single entry.
    pub fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.write()?.put(key, value)
    }

    /// Looks up a single entry. `Ok(None)` means not found.
    pub fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.read()?.get(key)
    }

    /// Removes a single entry.
    pub fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.write()?.delete(key)
    }

    /// Commits all entries of `batch` as one atomic unit.
    pub fn write_batch(&self, batch: &WriteBatch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.write()?.write_batch(batch)
    }

    /// Visits every entry whose key starts with `prefix`, in key order.
    ///
    /// The read lock and the engine's iteration state are held only for
    /// the duration of this call and released on every exit path. The
    /// first error returned by `visit` stops the scan and is returned.
    ///
    /// Returns the number of entries visited.
    pub fn scan_prefix<Err, F>(&self, prefix: &[u8], mut visit: F) -> Result<usize, Err>
    where
        Err: From<StoreError>,
        F: FnMut(&[u8], &[u8]) -> Result<(), Err>,
    {
        let engine = self.read()?;

        let mut visited = 0;
        let mut failure = None;
        engine.scan_prefix(prefix, &mut |key, value| {
            visited += 1;
            match visit(key, value) {
                Ok(()) => ControlFlow::Continue(()),
                Err(e) => {
                    failure = Some(e);
                    ControlFlow::Break(())
                }
            }
        })?;

        match failure {
            Some(e) => Err(e),
            None => Ok(visited),
        }
    }

    /// Collects every entry under `prefix`.
    pub fn entries_with_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<StorageEntry>> {
        let mut entries = Vec::new();
        self.scan_prefix(prefix, |key, value| {
            entries.push(StorageEntry::new(StorageKey::from_bytes(key), value));
            Ok::<_, StoreError>(())
        })?;
        Ok(entries)
    }

    /// Counts the entries under `prefix`.
    pub fn count_prefix(&self, prefix: &[u8]) -> StoreResult<usize> {
        self.scan_prefix(prefix, |_, _| Ok::<_, StoreError>(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEngine;
    use std::sync::Arc;
    use std::thread;

    fn memory_store() -> NamespacedStore<MemoryEngine> {
        NamespacedStore::with_engine(MemoryEngine::new())
    }

    #[test]
    fn test_put_get_delete() {
        let store = memory_store();
        store.put(b"DOC_1", b"A").unwrap();
        assert_eq!(store.get(b"DOC_1").unwrap(), Some(b"A".to_vec()));

        store.delete(b"DOC_1").unwrap();
        assert_eq!(store.get(b"DOC_1").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = memory_store();
        store.put(b"DOC_1", b"A").unwrap();
        store.put(b"DOC_1", b"B").unwrap();
        assert_eq!(store.get(b"DOC_1").unwrap(), Some(b"B".to_vec()));
    }

    #[test]
    fn test_entries_with_prefix_ordered() {
        let store = memory_store();
        let mut batch = WriteBatch::with_capacity(8);
        for id in ["2", "10", "1"] {
            batch.push(StorageKey::compose("DOC", id), id);
        }
        batch.push(StorageKey::compose("ZZZ", "1"), "z");
        store.write_batch(&batch).unwrap();

        let keys: Vec<_> = store
            .entries_with_prefix(b"DOC")
            .unwrap()
            .into_iter()
            .map(|e| e.key.to_string())
            .collect();
        assert_eq!(keys, vec!["DOC_1", "DOC_10", "DOC_2"]);
        assert_eq!(store.count_prefix(b"ZZZ").unwrap(), 1);
    }

    #[test]
    fn test_scan_propagates_visitor_error() {
        let store = memory_store();
        for i in 0..5 {
            store.put(format!("P_{}", i).as_bytes(), b"x").unwrap();
        }

        #[derive(Debug, PartialEq)]
        enum VisitError {
            Stop,
            Store,
        }
        impl From<StoreError> for VisitError {
            fn from(_: StoreError) -> Self {
                VisitError::Store
            }
        }

        let mut seen = 0;
        let result = store.scan_prefix(b"P", |_, _| {
            seen += 1;
            if seen == 3 {
                Err(VisitError::Stop)
            } else {
                Ok(())
            }
        });
        assert_eq!(result.unwrap_err(), VisitError::Stop);
        assert_eq!(seen, 3);

        // Lock released: a write goes through
        store.put(b"P_9", b"y").unwrap();
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let store = memory_store();
        store.write_batch(&WriteBatch::with_capacity(4)).unwrap();
        assert_eq!(store.count_prefix(b"").unwrap(), 0);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let store = Arc::new(memory_store());
        let mut handles = Vec::new();

        for t in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    let key = StorageKey::compose(&format!("T{}", t), &i.to_string());
                    store.put(key.as_bytes(), b"v").unwrap();
                    store.count_prefix(format!("T{}", t).as_bytes()).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        for t in 0..4 {
            assert_eq!(store.count_prefix(format!("T{}_", t).as_bytes()).unwrap(), 50);
        }
    }

    #[test]
    fn test_close() {
        let store = memory_store();
        store.put(b"k", b"v").unwrap();
        store.close().unwrap();
    }
}
