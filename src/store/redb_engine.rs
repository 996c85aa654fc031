//! Durable engine backed by redb
//!
//! All records live in a single `records` table with raw byte keys and
//! values. redb orders `&[u8]` keys lexicographically, which gives the
//! prefix scan its ordering. Every write commits its own transaction.

use std::fmt;
use std::ops::{ControlFlow, RangeFrom};
use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, TableDefinition};

use super::batch::WriteBatch;
use super::engine::{KvEngine, ScanVisitor};
use super::errors::{StoreError, StoreResult};

const RECORDS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("records");

/// redb-backed [`KvEngine`].
pub struct RedbEngine {
    db: Database,
    path: PathBuf,
}

impl RedbEngine {
    /// Opens the database file at `path`, creating it if missing.
    ///
    /// The parent directory must exist.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(|e| {
            StoreError::open_failed(format!("Failed to open database: {}", e))
                .with_details(format!("path: {}", path.display()))
        })?;

        // Create the table up front so read transactions never miss it
        let txn = db
            .begin_write()
            .map_err(|e| StoreError::open_failed(format!("Failed to begin transaction: {}", e)))?;
        txn.open_table(RECORDS)
            .map_err(|e| StoreError::open_failed(format!("Failed to create table: {}", e)))?;
        txn.commit()
            .map_err(|e| StoreError::open_failed(format!("Failed to commit table: {}", e)))?;

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }
}

impl fmt::Debug for RedbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbEngine").field("path", &self.path).finish()
    }
}

impl KvEngine for RedbEngine {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let fail =
            |e: redb::Error| StoreError::write_failed("Put failed").with_key(key).with_source(e);

        let txn = self.db.begin_write().map_err(|e| fail(e.into()))?;
        {
            let mut table = txn.open_table(RECORDS).map_err(|e| fail(e.into()))?;
            table.insert(key, value).map_err(|e| fail(e.into()))?;
        }
        txn.commit().map_err(|e| fail(e.into()))
    }

    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let fail =
            |e: redb::Error| StoreError::read_failed("Get failed").with_key(key).with_source(e);

        let txn = self.db.begin_read().map_err(|e| fail(e.into()))?;
        let table = txn.open_table(RECORDS).map_err(|e| fail(e.into()))?;
        let value = table.get(key).map_err(|e| fail(e.into()))?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        let fail =
            |e: redb::Error| StoreError::write_failed("Delete failed").with_key(key).with_source(e);

        let txn = self.db.begin_write().map_err(|e| fail(e.into()))?;
        {
            let mut table = txn.open_table(RECORDS).map_err(|e| fail(e.into()))?;
            table.remove(key).map_err(|e| fail(e.into()))?;
        }
        txn.commit().map_err(|e| fail(e.into()))
    }

    fn write_batch(&mut self, batch: &WriteBatch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let first_key = batch.entries()[0].key.as_bytes();
        let fail = |e: redb::Error| {
            StoreError::batch_failed(format!("Batch of {} entries failed", batch.len()))
                .with_details(format!("first key: {}", String::from_utf8_lossy(first_key)))
                .with_source(e)
        };

        let txn = self.db.begin_write().map_err(|e| fail(e.into()))?;
        {
            let mut table = txn.open_table(RECORDS).map_err(|e| fail(e.into()))?;
            for entry in batch.entries() {
                table
                    .insert(entry.key.as_bytes(), entry.value.as_slice())
                    .map_err(|e| fail(e.into()))?;
            }
        }
        // Dropping an uncommitted transaction aborts it, so a failure
        // above leaves none of the batch visible.
        txn.commit().map_err(|e| fail(e.into()))
    }

    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> StoreResult<()> {
        let fail = |e: redb::Error| {
            StoreError::iterate_failed("Prefix scan failed")
                .with_prefix(prefix)
                .with_source(e)
        };

        let txn = self.db.begin_read().map_err(|e| fail(e.into()))?;
        let table = txn.open_table(RECORDS).map_err(|e| fail(e.into()))?;

        let bounds: RangeFrom<&[u8]> = prefix..;
        for item in table.range(bounds).map_err(|e| fail(e.into()))? {
            let (key, value) = item.map_err(|e| fail(e.into()))?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            if visit(key, value.value()).is_break() {
                break;
            }
        }
        Ok(())
    }
}
