//! SQLite record store.
//!
//! Each record is one row: the id, the indexed columns the sync layer filters
//! on (`occurred_at` in Unix milliseconds, `synced`), and the full record as
//! a JSON body. The `synced` column is authoritative over the flag inside
//! the body.

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use recsync_core::RecordFilter;
use recsync_types::{Record, RecordId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// SQLite-based record store.
///
/// Uses WAL mode for concurrent reads/writes.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    body: String,
    synced: bool,
}

impl TryFrom<RecordRow> for Record {
    type Error = StoreError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let mut record = Record::from_json(&row.body)?;
        record.synced = row.synced;
        Ok(record)
    }
}

impl SqliteStore {
    /// Open (or create) a store at the given database path.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(":memory:")?;

        // A single connection that never recycles, otherwise the database
        // disappears with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                occurred_at INTEGER NOT NULL,
                synced INTEGER NOT NULL DEFAULT 0,
                body TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_records_occurred_synced ON records(occurred_at, synced)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert(&self, record: &Record) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO records (id, occurred_at, synced, body)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                occurred_at = excluded.occurred_at,
                synced = excluded.synced,
                body = excluded.body
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.date.timestamp_millis())
        .bind(record.synced)
        .bind(record.to_json()?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<Record>, StoreError> {
        // Millisecond bounds make the query a superset of the filter; the
        // exact check runs on the decoded records.
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT body, synced
            FROM records
            WHERE occurred_at >= ?1 AND occurred_at <= ?2
              AND (?3 IS NULL OR synced = ?3)
            ORDER BY rowid ASC
            "#,
        )
        .bind(filter.window.start().timestamp_millis())
        .bind(filter.window.end().timestamp_millis())
        .bind(filter.synced)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let record = Record::try_from(row)?;
            if filter.matches(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn set_uploaded(&self, id: &RecordId, synced: bool) -> Result<(), StoreError> {
        sqlx::query("UPDATE records SET synced = ?2 WHERE id = ?1")
            .bind(id.as_str())
            .bind(synced)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn bulk(&self, records: Vec<Record>) -> Result<(), StoreError> {
        for record in &records {
            self.upsert(record).await?;
        }
        Ok(())
    }

    async fn insert(&self, record: Record) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO records (id, occurred_at, synced, body)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.date.timestamp_millis())
        .bind(record.synced)
        .bind(record.to_json()?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>("SELECT body, synced FROM records WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Record::try_from).transpose()
    }
}
