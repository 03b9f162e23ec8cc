//! SyncOrchestrator - one bidirectional sync pass.
//!
//! A pass runs two independent phases over the rolling window:
//!
//! ```text
//! upload:      store.find(unsynced in window) -> chunks of 30   -> remote.upload
//!              -> mark each record synced
//! synchronize: store.find(all in window)      -> chunks of 1000 -> remote.synchronize
//!              -> store.bulk(canonical, synced) -> RecordsChanged
//! ```
//!
//! A failed remote call only loses its own chunk. A failed store write ends
//! the pass with an error.
//!
//! # Example
//!
//! ```ignore
//! let orchestrator = SyncOrchestrator::new(SyncConfig::default(), store, remote, auth);
//! if orchestrator.sync().await? {
//!     println!("{:?}", orchestrator.status().borrow().last_report);
//! }
//! ```

use chrono::{DateTime, Utc};
use recsync_core::{
    run_batches, BatchReport, ChunkOutcome, PassReport, Phase, RecordFilter, SyncStatus,
    SyncWindow, DEFAULT_RANGE_MONTHS,
};
use recsync_types::{Record, RecordId, UploadRecord};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::auth::AuthSignal;
use crate::remote::{RemoteError, RemoteSync};
use crate::store::{RecordStore, StoreError};

/// Records per upload call.
pub const UPLOAD_CHUNK_SIZE: usize = 30;

/// Ids per synchronize call.
pub const SYNCHRONIZE_CHUNK_SIZE: usize = 1000;

/// Quiet period before a requested pass starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Interval between periodic passes.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30 * 60);

const REFRESH_CAPACITY: usize = 16;

/// Orchestrator errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A local store write or read failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The window start is not representable.
    #[error("cannot build a {months} month window ending at {now}")]
    InvalidWindow {
        /// Pass time.
        now: DateTime<Utc>,
        /// Configured range.
        months: u32,
    },
}

/// Tuning for sync passes and their scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Window length in calendar months.
    pub range_months: u32,
    /// Records per upload call.
    pub upload_chunk_size: usize,
    /// Ids per synchronize call.
    pub synchronize_chunk_size: usize,
    /// Debounce wait for triggered passes.
    pub debounce: Duration,
    /// Heartbeat period (zero disables the heartbeat).
    pub heartbeat: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            range_months: DEFAULT_RANGE_MONTHS,
            upload_chunk_size: UPLOAD_CHUNK_SIZE,
            synchronize_chunk_size: SYNCHRONIZE_CHUNK_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            heartbeat: DEFAULT_HEARTBEAT,
        }
    }
}

impl SyncConfig {
    /// Set the window length.
    pub fn with_range_months(mut self, months: u32) -> Self {
        self.range_months = months;
        self
    }

    /// Set both chunk sizes.
    pub fn with_chunk_sizes(mut self, upload: usize, synchronize: usize) -> Self {
        self.upload_chunk_size = upload;
        self.synchronize_chunk_size = synchronize;
        self
    }

    /// Set the debounce wait.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the heartbeat period.
    pub fn with_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = heartbeat;
        self
    }
}

/// Sent after each synchronize chunk is written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordsChanged {
    /// Records overwritten by the chunk.
    pub count: usize,
}

/// Runs sync passes between a local store and the remote API.
pub struct SyncOrchestrator<S, R> {
    config: SyncConfig,
    store: S,
    remote: R,
    auth: AuthSignal,
    refresh: broadcast::Sender<RecordsChanged>,
    status: watch::Sender<SyncStatus>,
    cancel: Mutex<CancellationToken>,
    pass_lock: tokio::sync::Mutex<()>,
}

impl<S: RecordStore, R: RemoteSync> SyncOrchestrator<S, R> {
    /// Create an orchestrator.
    pub fn new(config: SyncConfig, store: S, remote: R, auth: AuthSignal) -> Self {
        let (refresh, _) = broadcast::channel(REFRESH_CAPACITY);
        let (status, _) = watch::channel(SyncStatus::new());
        Self {
            config,
            store,
            remote,
            auth,
            refresh,
            status,
            cancel: Mutex::new(CancellationToken::new()),
            pass_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Pass configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The auth signal gating every pass.
    pub fn auth(&self) -> &AuthSignal {
        &self.auth
    }

    /// The local store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The remote client.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Subscribe to refresh notifications.
    pub fn subscribe_refresh(&self) -> broadcast::Receiver<RecordsChanged> {
        self.refresh.subscribe()
    }

    /// Observe the sync status.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Abort any in-flight upload or synchronize call.
    ///
    /// The aborted chunk counts as failed and nothing is marked for it. Later
    /// passes get a fresh token.
    pub fn cancel_in_flight(&self) {
        let mut token = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        token.cancel();
        *token = CancellationToken::new();
    }

    /// Run one pass now. Returns whether a pass ran (false when signed out).
    pub async fn sync(&self) -> Result<bool, ClientError> {
        self.sync_at(Utc::now()).await
    }

    /// Run one pass with an explicit "now".
    pub async fn sync_at(&self, now: DateTime<Utc>) -> Result<bool, ClientError> {
        Ok(self.run_pass(now).await?.is_some())
    }

    /// Run one pass and return what it did. `None` when signed out.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> Result<Option<PassReport>, ClientError> {
        if !self.auth.is_authenticated() {
            self.cancel_in_flight();
            tracing::debug!("Sync skipped: not authenticated");
            return Ok(None);
        }

        let _pass = self.pass_lock.lock().await;

        // Take the token before checking auth, so a sign-out in between
        // cancels it.
        let token = self.current_token();
        if !self.auth.is_authenticated() {
            tracing::debug!("Sync skipped: signed out while waiting");
            return Ok(None);
        }

        let result = self.run_phases(now, &token).await;

        match &result {
            Ok(report) => {
                tracing::info!(
                    "Sync pass done: uploaded {}/{}, synchronized {}/{}",
                    report.upload.items_committed,
                    report.upload.items_committed + report.upload.items_failed,
                    report.synchronize.items_committed,
                    report.synchronize.items_committed + report.synchronize.items_failed,
                );
                self.status.send_modify(|s| s.record_pass(*report, now));
            }
            Err(e) => {
                tracing::error!("Sync pass failed: {}", e);
                self.status
                    .send_modify(|s| s.record_failure(e.to_string(), now));
            }
        }

        result.map(Some)
    }

    async fn run_phases(
        &self,
        now: DateTime<Utc>,
        token: &CancellationToken,
    ) -> Result<PassReport, ClientError> {
        let months = self.config.range_months;
        let window =
            SyncWindow::ending_at(now, months).ok_or(ClientError::InvalidWindow { now, months })?;

        let upload = self.upload_phase(window, token).await?;
        let synchronize = self.synchronize_phase(window, token).await?;

        Ok(PassReport {
            window,
            upload,
            synchronize,
        })
    }

    async fn upload_phase(
        &self,
        window: SyncWindow,
        token: &CancellationToken,
    ) -> Result<BatchReport, ClientError> {
        let pending = self
            .store
            .find(&RecordFilter::pending_upload(window))
            .await?;
        if pending.is_empty() {
            tracing::debug!("Upload skipped: nothing pending");
            return Ok(Default::default());
        }

        let projected: Vec<UploadRecord> = pending.iter().map(UploadRecord::from).collect();
        tracing::debug!("Uploading {} records", projected.len());

        let _phase = PhaseGuard::begin(&self.status, Phase::Upload);
        run_batches(&projected, self.config.upload_chunk_size, move |chunk| {
            self.upload_chunk(chunk, token)
        })
        .await
    }

    async fn upload_chunk(
        &self,
        chunk: &[UploadRecord],
        token: &CancellationToken,
    ) -> Result<ChunkOutcome, ClientError> {
        if let Err(e) = cancellable(token, self.remote.upload(chunk)).await {
            tracing::warn!("Upload of {} records failed: {}", chunk.len(), e);
            return Ok(ChunkOutcome::Failed);
        }

        for record in chunk {
            self.store.set_uploaded(&record.id, true).await?;
        }
        Ok(ChunkOutcome::Committed)
    }

    async fn synchronize_phase(
        &self,
        window: SyncWindow,
        token: &CancellationToken,
    ) -> Result<BatchReport, ClientError> {
        let ids: Vec<RecordId> = self
            .store
            .find(&RecordFilter::in_window(window))
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect();
        if ids.is_empty() {
            tracing::debug!("Synchronize skipped: window is empty");
            return Ok(Default::default());
        }

        tracing::debug!("Synchronizing {} records", ids.len());

        let _phase = PhaseGuard::begin(&self.status, Phase::Synchronize);
        run_batches(&ids, self.config.synchronize_chunk_size, move |chunk| {
            self.synchronize_chunk(chunk, token)
        })
        .await
    }

    async fn synchronize_chunk(
        &self,
        chunk: &[RecordId],
        token: &CancellationToken,
    ) -> Result<ChunkOutcome, ClientError> {
        let records = match cancellable(token, self.remote.synchronize(chunk)).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Synchronize of {} ids failed: {}", chunk.len(), e);
                return Ok(ChunkOutcome::Failed);
            }
        };

        let canonical: Vec<Record> = records.into_iter().map(Record::into_synced).collect();
        let count = canonical.len();
        self.store.bulk(canonical).await?;

        // No subscribers is fine.
        let _ = self.refresh.send(RecordsChanged { count });
        Ok(ChunkOutcome::Committed)
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Marks a phase as in flight until dropped, including when the pass future
/// itself is dropped mid-call.
struct PhaseGuard<'a> {
    status: &'a watch::Sender<SyncStatus>,
    phase: Phase,
}

impl<'a> PhaseGuard<'a> {
    fn begin(status: &'a watch::Sender<SyncStatus>, phase: Phase) -> Self {
        status.send_modify(|s| s.begin(phase));
        Self { status, phase }
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        let phase = self.phase;
        self.status.send_modify(|s| s.end(phase));
    }
}

async fn cancellable<T>(
    token: &CancellationToken,
    call: impl Future<Output = Result<T, RemoteError>>,
) -> Result<T, RemoteError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(RemoteError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockRemote;
    use crate::store::MemoryStore;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use recsync_types::Hero;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn record(n: usize, days_ago: i64) -> Record {
        Record::new(
            Hero::new(format!("h-{}", n % 7), format!("Hero {n}")),
            (n % 10) as u32 + 1,
            now() - ChronoDuration::days(days_ago),
        )
    }

    fn unsynced(count: usize) -> Vec<Record> {
        (0..count).map(|n| record(n, (n % 50) as i64)).collect()
    }

    fn orchestrator(
        records: Vec<Record>,
        authenticated: bool,
    ) -> SyncOrchestrator<MemoryStore, MockRemote> {
        SyncOrchestrator::new(
            SyncConfig::default(),
            MemoryStore::with_records(records),
            MockRemote::new(),
            AuthSignal::new(authenticated),
        )
    }

    fn call_sizes(calls: Vec<Vec<RecordId>>) -> Vec<usize> {
        calls.iter().map(Vec::len).collect()
    }

    #[tokio::test]
    async fn unauthenticated_pass_does_nothing() {
        let orch = orchestrator(unsynced(5), false);

        assert!(!orch.sync_at(now()).await.unwrap());

        assert_eq!(orch.store().write_count(), 0);
        assert!(orch.remote().upload_calls().is_empty());
        assert!(orch.remote().synchronize_calls().is_empty());
        assert_eq!(orch.status().borrow().passes, 0);
    }

    #[tokio::test]
    async fn uploads_in_chunks_of_thirty() {
        let orch = orchestrator(unsynced(45), true);

        assert!(orch.sync_at(now()).await.unwrap());

        assert_eq!(call_sizes(orch.remote().upload_calls()), vec![30, 15]);
        assert!(orch.store().records().iter().all(|r| r.synced));
    }

    #[tokio::test]
    async fn upload_sends_records_in_store_order() {
        let records = unsynced(35);
        let expected: Vec<RecordId> = records.iter().map(|r| r.id.clone()).collect();
        let orch = orchestrator(records, true);

        orch.sync_at(now()).await.unwrap();

        let sent: Vec<RecordId> = orch.remote().upload_calls().concat();
        assert_eq!(sent, expected);
    }

    #[tokio::test]
    async fn synchronizes_in_chunks_of_a_thousand() {
        let records: Vec<Record> = (0..1500)
            .map(|n| record(n, (n % 50) as i64).into_synced())
            .collect();
        let orch = orchestrator(records.clone(), true);
        orch.remote().seed(records);
        let mut refresh = orch.subscribe_refresh();

        orch.sync_at(now()).await.unwrap();

        assert!(orch.remote().upload_calls().is_empty());
        assert_eq!(
            call_sizes(orch.remote().synchronize_calls()),
            vec![1000, 500]
        );
        assert_eq!(refresh.try_recv().unwrap(), RecordsChanged { count: 1000 });
        assert_eq!(refresh.try_recv().unwrap(), RecordsChanged { count: 500 });
        assert!(refresh.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_window_makes_no_calls() {
        let old = vec![record(1, 90), record(2, 400)];
        let orch = orchestrator(old.clone(), true);

        let report = orch.run_pass(now()).await.unwrap().unwrap();

        assert!(orch.remote().upload_calls().is_empty());
        assert!(orch.remote().synchronize_calls().is_empty());
        assert_eq!(report.upload.chunks, 0);
        assert_eq!(report.synchronize.chunks, 0);
        assert_eq!(orch.store().records(), old);
    }

    #[tokio::test]
    async fn records_outside_window_are_untouched() {
        let inside = record(1, 3);
        let outside = record(2, 75);
        let orch = orchestrator(vec![inside.clone(), outside.clone()], true);

        orch.sync_at(now()).await.unwrap();

        assert_eq!(orch.remote().upload_calls(), vec![vec![inside.id.clone()]]);
        assert_eq!(orch.remote().synchronize_calls(), vec![vec![inside.id]]);
        assert_eq!(orch.store().get(&outside.id).await.unwrap(), Some(outside));
    }

    #[tokio::test]
    async fn failed_upload_chunk_stays_unsynced_and_pull_still_runs() {
        let records = unsynced(60);
        let first_chunk: Vec<RecordId> = records[..30].iter().map(|r| r.id.clone()).collect();
        let orch = orchestrator(records, true);
        orch.remote().fail_upload_call(1);

        let report = orch.run_pass(now()).await.unwrap().unwrap();

        assert_eq!(report.upload.failed, 1);
        assert_eq!(report.upload.items_committed, 30);
        assert!(!report.is_converged());
        for id in &first_chunk {
            assert!(!orch.store().get(id).await.unwrap().unwrap().synced);
        }
        // Pull covers all 60, but only the uploaded 30 exist on the server.
        assert_eq!(call_sizes(orch.remote().synchronize_calls()), vec![60]);
        let synced = orch.store().records().iter().filter(|r| r.synced).count();
        assert_eq!(synced, 30);
    }

    #[tokio::test]
    async fn failed_upload_is_retried_next_pass() {
        let orch = orchestrator(unsynced(10), true);
        orch.remote().fail_upload_call(1);

        orch.sync_at(now()).await.unwrap();
        orch.sync_at(now()).await.unwrap();

        assert_eq!(call_sizes(orch.remote().upload_calls()), vec![10, 10]);
        assert!(orch.store().records().iter().all(|r| r.synced));
    }

    #[tokio::test]
    async fn failed_synchronize_chunk_is_not_applied() {
        let local = record(1, 2).into_synced();
        let server = local.clone().with_remark("edited elsewhere");
        let orch = orchestrator(vec![local.clone()], true);
        orch.remote().seed([server]);
        orch.remote().fail_synchronize_call(1);
        let mut refresh = orch.subscribe_refresh();

        let report = orch.run_pass(now()).await.unwrap().unwrap();

        assert_eq!(report.synchronize.failed, 1);
        assert_eq!(orch.store().get(&local.id).await.unwrap(), Some(local));
        assert!(refresh.try_recv().is_err());
    }

    #[tokio::test]
    async fn pulled_copies_overwrite_local_ones() {
        let local = record(1, 2).with_remark("local");
        let server = local.clone().with_remark("canonical");
        let orch = orchestrator(vec![local.clone()], true);

        orch.sync_at(now()).await.unwrap();
        // Edited on another device after the upload.
        orch.remote().seed([server]);
        orch.sync_at(now()).await.unwrap();

        let stored = orch.store().get(&local.id).await.unwrap().unwrap();
        assert_eq!(stored.remark, "canonical");
        assert!(stored.synced);
    }

    #[tokio::test]
    async fn pull_brings_in_unknown_server_state_only_for_local_ids() {
        let local = record(1, 2).into_synced();
        let stranger = record(2, 2).into_synced();
        let orch = orchestrator(vec![local.clone()], true);
        orch.remote().seed([local.clone(), stranger.clone()]);

        orch.sync_at(now()).await.unwrap();

        assert_eq!(orch.store().len(), 1);
        assert!(orch.store().get(&stranger.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_pass_uploads_nothing() {
        let orch = orchestrator(unsynced(12), true);

        orch.sync_at(now()).await.unwrap();
        let before = orch.store().records();
        orch.sync_at(now()).await.unwrap();

        assert_eq!(orch.remote().upload_calls().len(), 1);
        assert_eq!(orch.store().records(), before);
    }

    #[tokio::test]
    async fn store_write_failure_propagates() {
        let orch = orchestrator(unsynced(3), true);
        orch.store().fail_next_write("disk full");

        let result = orch.sync_at(now()).await;

        assert!(matches!(
            result,
            Err(ClientError::Store(StoreError::WriteFailed(_)))
        ));
        let status = orch.status().borrow().clone();
        assert!(status.last_error.as_deref().unwrap().contains("disk full"));
        assert!(!status.loading());
        assert_eq!(status.passes, 1);
    }

    #[tokio::test]
    async fn pull_write_failure_propagates_without_refresh() {
        let records: Vec<Record> = (0..3).map(|n| record(n, 1).into_synced()).collect();
        let orch = orchestrator(records.clone(), true);
        orch.remote().seed(records);
        orch.store().fail_next_write("disk full");
        let mut refresh = orch.subscribe_refresh();

        let result = orch.run_pass(now()).await;

        assert!(matches!(result, Err(ClientError::Store(_))));
        assert!(orch.remote().upload_calls().is_empty());
        assert_eq!(orch.remote().synchronize_calls().len(), 1);
        assert!(refresh.try_recv().is_err());
        let status = orch.status().borrow().clone();
        assert!(status.last_error.as_deref().unwrap().contains("disk full"));
        assert!(status.last_report.is_none());
        assert!(!status.loading());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_pass_clears_loading_flag() {
        let orch = orchestrator(unsynced(2), true);
        orch.remote().set_latency(std::time::Duration::from_secs(10));
        let status = orch.status();

        let result =
            tokio::time::timeout(std::time::Duration::from_secs(1), orch.sync_at(now())).await;

        assert!(result.is_err());
        assert!(!status.borrow().uploading);
        assert!(!status.borrow().loading());
        assert_eq!(status.borrow().passes, 0);
        assert!(orch.store().records().iter().all(|r| !r.synced));
    }

    #[tokio::test(start_paused = true)]
    async fn sign_out_while_waiting_for_lock_skips_pass() {
        let orch = Arc::new(orchestrator(unsynced(2), true));
        orch.remote().set_latency(std::time::Duration::from_secs(10));

        let first = tokio::spawn({
            let orch = orch.clone();
            async move { orch.run_pass(now()).await }
        });
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        let second = tokio::spawn({
            let orch = orch.clone();
            async move { orch.run_pass(now()).await }
        });
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        orch.auth().set(false);
        orch.cancel_in_flight();

        assert!(first.await.unwrap().unwrap().is_some());
        assert!(second.await.unwrap().unwrap().is_none());
        assert_eq!(orch.remote().upload_calls().len(), 1);
        assert!(orch.store().records().iter().all(|r| !r.synced));
    }

    #[tokio::test]
    async fn status_records_completed_pass() {
        let orch = orchestrator(unsynced(4), true);
        let status = orch.status();

        orch.sync_at(now()).await.unwrap();

        let status = status.borrow();
        assert_eq!(status.passes, 1);
        assert_eq!(status.last_run_at, Some(now()));
        assert!(status.last_report.unwrap().is_converged());
        assert!(status.last_error.is_none());
        assert!(!status.loading());
    }

    #[tokio::test]
    async fn zero_chunk_size_acts_as_one() {
        let orch = SyncOrchestrator::new(
            SyncConfig::default().with_chunk_sizes(0, 0),
            MemoryStore::with_records(unsynced(3)),
            MockRemote::new(),
            AuthSignal::new(true),
        );

        orch.sync_at(now()).await.unwrap();

        assert_eq!(call_sizes(orch.remote().upload_calls()), vec![1, 1, 1]);
        assert_eq!(call_sizes(orch.remote().synchronize_calls()), vec![1, 1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_is_set_while_uploading() {
        let orch = Arc::new(orchestrator(unsynced(2), true));
        orch.remote().set_latency(std::time::Duration::from_secs(10));
        let status = orch.status();

        let pass = tokio::spawn({
            let orch = orch.clone();
            async move { orch.sync_at(now()).await }
        });
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;

        assert!(status.borrow().uploading);
        assert!(!status.borrow().synchronizing);

        assert!(pass.await.unwrap().unwrap());
        assert!(!status.borrow().loading());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_in_flight_marks_nothing() {
        let orch = Arc::new(orchestrator(unsynced(5), true));
        orch.remote().set_latency(std::time::Duration::from_secs(10));

        let pass = tokio::spawn({
            let orch = orch.clone();
            async move { orch.run_pass(now()).await }
        });
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        orch.cancel_in_flight();

        let report = pass.await.unwrap().unwrap().unwrap();
        assert_eq!(report.upload.failed, 1);
        assert_eq!(report.synchronize.failed, 1);
        assert!(orch.store().records().iter().all(|r| !r.synced));
        assert!(orch.remote().synchronize_calls().is_empty());
        assert_eq!(orch.store().write_count(), 0);

        // The next pass is not affected.
        orch.remote().reset();
        orch.sync_at(now()).await.unwrap();
        assert!(orch.store().records().iter().all(|r| r.synced));
    }
}
