//! Record store abstraction.
//!
//! The local store is the authority for records. The sync layer only ever
//! reads through a [`RecordFilter`], flips `synced` flags and overwrites
//! records with canonical copies. It never deletes.
//!
//! Writes are direct and non-transactional: callers must tolerate a store
//! that reflects a partially synced state at any point.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use recsync_core::RecordFilter;
use recsync_types::{Record, RecordId, SyncError};
use thiserror::Error;

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored record could not be encoded or decoded.
    #[error("record encoding error: {0}")]
    Encoding(#[from] SyncError),

    /// A write was refused by the store.
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Trait for local record store backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Return every record matching the filter, in a stable order.
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<Record>, StoreError>;

    /// Set the `synced` flag of a single record.
    ///
    /// Unknown ids are ignored.
    async fn set_uploaded(&self, id: &RecordId, synced: bool) -> Result<(), StoreError>;

    /// Insert or wholesale replace each record, in order.
    async fn bulk(&self, records: Vec<Record>) -> Result<(), StoreError>;

    /// Insert a newly created record.
    async fn insert(&self, record: Record) -> Result<(), StoreError>;

    /// Look up a single record.
    async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError>;
}
