//! When passes run.
//!
//! [`spawn_trigger`] requests an initial pass and starts background tasks
//! around an orchestrator:
//! - a debounced runner: every request restarts a quiet period, and one pass
//!   runs once the period elapses without new requests
//! - an auth watcher: requests a pass on every auth transition, and cancels
//!   in-flight calls when auth is lost
//! - a heartbeat: requests a pass every `heartbeat` (disabled when zero)
//!
//! A request that arrives while a pass is running schedules one more pass
//! after it.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};

use crate::orchestrator::SyncOrchestrator;
use crate::remote::RemoteSync;
use crate::store::RecordStore;

/// Cheap handle to request a debounced pass.
#[derive(Debug, Clone)]
pub struct SyncTrigger {
    tx: mpsc::Sender<()>,
}

impl SyncTrigger {
    /// Ask for a pass. Requests made during the quiet period collapse into one.
    pub fn request(&self) {
        // Full means a request is already queued.
        let _ = self.tx.try_send(());
    }
}

/// Owns the trigger tasks. Dropping it stops them.
#[derive(Debug)]
pub struct TriggerHandle {
    trigger: SyncTrigger,
    tasks: Vec<JoinHandle<()>>,
}

impl TriggerHandle {
    /// Ask for a debounced pass.
    pub fn request(&self) {
        self.trigger.request();
    }

    /// A cloneable trigger for other tasks.
    pub fn trigger(&self) -> SyncTrigger {
        self.trigger.clone()
    }

    /// Stop all trigger tasks. A pass already running is aborted with them.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for TriggerHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Start the trigger tasks for an orchestrator.
///
/// Must be called from within a tokio runtime.
pub fn spawn_trigger<S, R>(orchestrator: Arc<SyncOrchestrator<S, R>>) -> TriggerHandle
where
    S: RecordStore + 'static,
    R: RemoteSync + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    let trigger = SyncTrigger { tx };

    // Initial pass.
    trigger.request();

    // Subscribe here so auth changes made before the task first runs are seen.
    let auth = orchestrator.auth().subscribe();
    let mut tasks = vec![
        tokio::spawn(run_debounced(orchestrator.clone(), rx)),
        tokio::spawn(watch_auth(orchestrator.clone(), auth, trigger.clone())),
    ];

    let period = orchestrator.config().heartbeat;
    if period.is_zero() {
        tracing::info!("Heartbeat disabled");
    } else {
        tracing::info!("Heartbeat started (interval: {}s)", period.as_secs());
        let heartbeat = trigger.clone();
        tasks.push(tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                tracing::debug!("Heartbeat");
                heartbeat.request();
            }
        }));
    }

    TriggerHandle { trigger, tasks }
}

async fn run_debounced<S, R>(orchestrator: Arc<SyncOrchestrator<S, R>>, mut rx: mpsc::Receiver<()>)
where
    S: RecordStore,
    R: RemoteSync,
{
    let debounce = orchestrator.config().debounce;

    while rx.recv().await.is_some() {
        loop {
            match timeout(debounce, rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        match orchestrator.sync().await {
            Ok(true) => tracing::debug!("Triggered pass finished"),
            Ok(false) => tracing::debug!("Triggered pass skipped: not authenticated"),
            Err(e) => tracing::error!("Triggered pass failed: {}", e),
        }
    }
}

async fn watch_auth<S, R>(
    orchestrator: Arc<SyncOrchestrator<S, R>>,
    mut auth: watch::Receiver<bool>,
    trigger: SyncTrigger,
) where
    S: RecordStore,
    R: RemoteSync,
{
    while auth.changed().await.is_ok() {
        let authenticated = *auth.borrow_and_update();
        tracing::info!("Auth changed (authenticated: {})", authenticated);
        if !authenticated {
            orchestrator.cancel_in_flight();
        }
        trigger.request();
    }
}
