//! Key-value engine trait
//!
//! The interface the namespaced store needs from an ordered KV engine:
//! point put/get/delete, atomic batch write, and ordered prefix scans.
//! Opening is the implementation's constructor; closing is drop.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use super::batch::WriteBatch;
use super::errors::StoreResult;

/// Visitor passed to [`KvEngine::scan_prefix`].
pub type ScanVisitor<'v> = dyn FnMut(&[u8], &[u8]) -> ControlFlow<()> + 'v;

/// Ordered key-value engine.
///
/// Keys are ordered byte-lexicographically. Mutating calls take
/// `&mut self`; the store serialises access through its lock.
pub trait KvEngine: Send + Sync {
    /// Write a single entry.
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Read a single entry. `Ok(None)` when the key is absent.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Remove a single entry. Removing an absent key succeeds.
    fn delete(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Commit every entry of `batch`, or none of them.
    fn write_batch(&mut self, batch: &WriteBatch) -> StoreResult<()>;

    /// Visit entries whose key starts with `prefix`, in key order.
    ///
    /// Stops early when `visit` returns `ControlFlow::Break`. Any
    /// engine-side iteration state is released before returning.
    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> StoreResult<()>;
}

/// In-memory engine backed by a `BTreeMap`.
///
/// Not durable. Used for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryEngine {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvEngine for MemoryEngine {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn write_batch(&mut self, batch: &WriteBatch) -> StoreResult<()> {
        for entry in batch.entries() {
            self.entries
                .insert(entry.key.as_bytes().to_vec(), entry.value.clone());
        }
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> StoreResult<()> {
        for (key, value) in self.entries.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            if visit(key.as_slice(), value.as_slice()).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StorageKey;

    fn collect(engine: &MemoryEngine, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut seen = Vec::new();
        engine
            .scan_prefix(prefix, &mut |k, v| {
                seen.push((k.to_vec(), v.to_vec()));
                ControlFlow::Continue(())
            })
            .unwrap();
        seen
    }

    #[test]
    fn test_put_get_delete() {
        let mut engine = MemoryEngine::new();
        engine.put(b"k", b"v").unwrap();
        assert_eq!(engine.get(b"k").unwrap(), Some(b"v".to_vec()));

        engine.delete(b"k").unwrap();
        assert_eq!(engine.get(b"k").unwrap(), None);

        // Absent key
        engine.delete(b"k").unwrap();
    }

    #[test]
    fn test_scan_is_ordered_and_bounded() {
        let mut engine = MemoryEngine::new();
        for key in ["B_2", "A_1", "B_10", "C_1", "B_1"] {
            engine.put(key.as_bytes(), b"x").unwrap();
        }

        let keys: Vec<_> = collect(&engine, b"B")
            .into_iter()
            .map(|(k, _)| String::from_utf8(k).unwrap())
            .collect();
        assert_eq!(keys, vec!["B_1", "B_10", "B_2"]);
    }

    #[test]
    fn test_scan_break() {
        let mut engine = MemoryEngine::new();
        for i in 0..5 {
            engine.put(format!("P_{}", i).as_bytes(), b"x").unwrap();
        }

        let mut visited = 0;
        engine
            .scan_prefix(b"P", &mut |_, _| {
                visited += 1;
                if visited == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_write_batch() {
        let mut engine = MemoryEngine::new();
        let mut batch = WriteBatch::with_capacity(3);
        batch.push(StorageKey::compose("D", "1"), "a");
        batch.push(StorageKey::compose("D", "2"), "b");
        engine.write_batch(&batch).unwrap();
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.get(b"D_2").unwrap(), Some(b"b".to_vec()));
    }
}
