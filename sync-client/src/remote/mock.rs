//! Mock remote for testing.
//!
//! Simulates the server: uploads become canonical copies that later
//! synchronize calls return. Captures every call and supports failure
//! injection per call and artificial latency.

use super::{RemoteError, RemoteSync};
use async_trait::async_trait;
use recsync_types::{Hero, Record, RecordId, UploadRecord};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Mock remote for testing.
///
/// Clones share the same simulated server.
#[derive(Debug, Default, Clone)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

#[derive(Debug, Default)]
struct MockRemoteInner {
    server: HashMap<RecordId, Record>,
    upload_calls: Vec<Vec<RecordId>>,
    synchronize_calls: Vec<Vec<RecordId>>,
    fail_uploads: HashSet<usize>,
    fail_synchronizes: HashSet<usize>,
    latency: Option<Duration>,
}

impl MockRemote {
    /// Create a mock with an empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put canonical copies on the server without going through `upload()`.
    pub fn seed(&self, records: impl IntoIterator<Item = Record>) {
        let mut inner = self.lock();
        for record in records {
            inner.server.insert(record.id.clone(), record);
        }
    }

    /// The server's copy of a record.
    pub fn server_record(&self, id: &RecordId) -> Option<Record> {
        self.lock().server.get(id).cloned()
    }

    /// Ids sent by each `upload()` call, in call order.
    pub fn upload_calls(&self) -> Vec<Vec<RecordId>> {
        self.lock().upload_calls.clone()
    }

    /// Ids sent by each `synchronize()` call, in call order.
    pub fn synchronize_calls(&self) -> Vec<Vec<RecordId>> {
        self.lock().synchronize_calls.clone()
    }

    /// Make the n-th `upload()` call (1-based, counted from creation) fail.
    pub fn fail_upload_call(&self, n: usize) {
        self.lock().fail_uploads.insert(n);
    }

    /// Make the n-th `synchronize()` call (1-based) fail.
    pub fn fail_synchronize_call(&self, n: usize) {
        self.lock().fail_synchronizes.insert(n);
    }

    /// Delay every call by the given duration before it takes effect.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = Some(latency);
    }

    /// Clear all state (server, calls, injected failures, latency).
    pub fn reset(&self) {
        *self.lock() = MockRemoteInner::default();
    }

    fn lock(&self) -> MutexGuard<'_, MockRemoteInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn canonical(record: &UploadRecord) -> Record {
    Record {
        id: record.id.clone(),
        hero: Hero::new(record.hero.id.clone(), record.hero.name.clone()),
        rank: record.rank,
        date: record.date,
        remark: record.remark.clone(),
        lineup: record.lineup.clone(),
        synced: true,
    }
}

#[async_trait]
impl RemoteSync for MockRemote {
    async fn upload(&self, records: &[UploadRecord]) -> Result<(), RemoteError> {
        let call = {
            let mut inner = self.lock();
            inner
                .upload_calls
                .push(records.iter().map(|r| r.id.clone()).collect());
            inner.upload_calls.len()
        };

        self.simulate_latency().await;

        let mut inner = self.lock();
        if inner.fail_uploads.contains(&call) {
            return Err(RemoteError::Request(format!("injected failure on upload #{call}")));
        }
        for record in records {
            inner.server.insert(record.id.clone(), canonical(record));
        }
        Ok(())
    }

    async fn synchronize(&self, ids: &[RecordId]) -> Result<Vec<Record>, RemoteError> {
        let call = {
            let mut inner = self.lock();
            inner.synchronize_calls.push(ids.to_vec());
            inner.synchronize_calls.len()
        };

        self.simulate_latency().await;

        let inner = self.lock();
        if inner.fail_synchronizes.contains(&call) {
            return Err(RemoteError::Request(format!(
                "injected failure on synchronize #{call}"
            )));
        }
        Ok(ids
            .iter()
            .filter_map(|id| inner.server.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn upload_record(name: &str) -> UploadRecord {
        UploadRecord::from(&Record::new(Hero::new("h", name), 1, Utc::now()))
    }

    #[tokio::test]
    async fn uploads_become_canonical_copies() {
        let remote = MockRemote::new();
        let record = upload_record("Zeus");

        remote.upload(std::slice::from_ref(&record)).await.unwrap();

        let stored = remote.server_record(&record.id).unwrap();
        assert_eq!(stored.hero.name, "Zeus");
        assert!(stored.synced);
    }

    #[tokio::test]
    async fn synchronize_returns_known_ids_in_request_order() {
        let remote = MockRemote::new();
        let a = upload_record("A");
        let b = upload_record("B");
        remote.upload(&[a.clone(), b.clone()]).await.unwrap();

        let unknown = RecordId::from("nope");
        let result = remote
            .synchronize(&[b.id.clone(), unknown, a.id.clone()])
            .await
            .unwrap();

        let ids: Vec<_> = result.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn calls_are_captured() {
        let remote = MockRemote::new();
        let a = upload_record("A");

        remote.upload(std::slice::from_ref(&a)).await.unwrap();
        remote.synchronize(&[a.id.clone()]).await.unwrap();

        assert_eq!(remote.upload_calls(), vec![vec![a.id.clone()]]);
        assert_eq!(remote.synchronize_calls(), vec![vec![a.id]]);
    }

    #[tokio::test]
    async fn injected_upload_failure_stores_nothing() {
        let remote = MockRemote::new();
        remote.fail_upload_call(1);
        let a = upload_record("A");

        let result = remote.upload(std::slice::from_ref(&a)).await;
        assert!(matches!(result, Err(RemoteError::Request(_))));
        assert!(remote.server_record(&a.id).is_none());

        // Second call goes through
        remote.upload(std::slice::from_ref(&a)).await.unwrap();
        assert!(remote.server_record(&a.id).is_some());
    }

    #[tokio::test]
    async fn injected_synchronize_failure() {
        let remote = MockRemote::new();
        remote.fail_synchronize_call(1);

        let result = remote.synchronize(&[RecordId::from("a")]).await;
        assert!(matches!(result, Err(RemoteError::Request(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_calls() {
        let remote = MockRemote::new();
        remote.set_latency(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        remote.synchronize(&[]).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let remote = MockRemote::new();
        let a = upload_record("A");
        remote.upload(std::slice::from_ref(&a)).await.unwrap();
        remote.fail_upload_call(2);

        remote.reset();

        assert!(remote.upload_calls().is_empty());
        assert!(remote.server_record(&a.id).is_none());
        remote.upload(std::slice::from_ref(&a)).await.unwrap();
    }
}
