//! In-memory record store.
//!
//! Keeps records in insertion order. Supports write-failure injection and
//! write counting so sync passes can be verified without a database.

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use recsync_core::RecordFilter;
use recsync_types::{Record, RecordId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory record store.
///
/// Clones share the same records.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    records: Vec<Record>,
    index: HashMap<RecordId, usize>,
    writes: usize,
    fail_next_write: Option<String>,
}

impl MemoryStoreInner {
    fn upsert(&mut self, record: Record) {
        match self.index.get(&record.id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    fn begin_write(&mut self) -> Result<(), StoreError> {
        if let Some(error) = self.fail_next_write.take() {
            return Err(StoreError::WriteFailed(error));
        }
        self.writes += 1;
        Ok(())
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with records (not counted as writes).
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for record in records {
                inner.upsert(record);
            }
        }
        store
    }

    /// Snapshot of every record, in insertion order.
    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Number of successful write operations so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Cause the next write (`set_uploaded`, `bulk` or `insert`) to fail.
    pub fn fail_next_write(&self, error: &str) {
        self.lock().fail_next_write = Some(error.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<Record>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn set_uploaded(&self, id: &RecordId, synced: bool) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.begin_write()?;
        if let Some(&pos) = inner.index.get(id) {
            inner.records[pos].synced = synced;
        }
        Ok(())
    }

    async fn bulk(&self, records: Vec<Record>) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.begin_write()?;
        for record in records {
            inner.upsert(record);
        }
        Ok(())
    }

    async fn insert(&self, record: Record) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.begin_write()?;
        inner.upsert(record);
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let inner = self.lock();
        Ok(inner.index.get(id).map(|&pos| inner.records[pos].clone()))
    }
}
