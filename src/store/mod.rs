//! Namespaced record store
//!
//! Persists STEP records as `<namespace>_<id> -> definition` pairs in an
//! ordered key-value engine and reads them back by namespace prefix.
//!
//! # Guarantees
//!
//! - A batch commits atomically: all of its entries become visible, or none
//! - Prefix scans yield keys in byte-lexicographic order
//! - Writing an existing key overwrites it; nothing is merged
//! - Engine failures surface as `StoreError` and are never retried here

mod batch;
mod engine;
mod errors;
mod key;
mod namespaced;
mod redb_engine;

pub use batch::{WriteBatch, DEFAULT_BATCH_CAPACITY};
pub use engine::{KvEngine, MemoryEngine, ScanVisitor};
pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use key::{split_id, StorageEntry, StorageKey, KEY_SEPARATOR};
pub use namespaced::NamespacedStore;
pub use redb_engine::RedbEngine;
