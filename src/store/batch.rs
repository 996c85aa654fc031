//! Write batches
//!
//! A batch is an ordered list of pending entries committed to the engine
//! as one atomic unit. Batches live only between creation and flush;
//! nothing about them is persisted.

use super::key::{StorageEntry, StorageKey};

/// Default number of entries per batch
pub const DEFAULT_BATCH_CAPACITY: usize = 1000;

/// An ordered, bounded set of pending writes.
#[derive(Debug, Clone)]
pub struct WriteBatch {
    entries: Vec<StorageEntry>,
    capacity: usize,
}

impl WriteBatch {
    /// Create a batch that reports full at `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, preserving insertion order.
    pub fn push(&mut self, key: StorageKey, value: impl Into<Vec<u8>>) {
        self.entries.push(StorageEntry::new(key, value));
    }

    pub fn entries(&self) -> &[StorageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the batch holds `capacity` entries.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Empty the batch for reuse, keeping its allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for WriteBatch {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BATCH_CAPACITY)
    }
}

impl From<Vec<StorageEntry>> for WriteBatch {
    fn from(entries: Vec<StorageEntry>) -> Self {
        let capacity = entries.len().max(1);
        Self { entries, capacity }
    }
}
