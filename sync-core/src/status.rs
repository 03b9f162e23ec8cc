//! Sync status bookkeeping.
//!
//! [`SyncStatus`] is the explicit state context a UI or scheduler observes:
//! which network phase is in flight, how many passes ran and what the last
//! one did. It is owned by the orchestrator and only changed through the
//! transition methods below, so it stays a plain value with no I/O.

use chrono::{DateTime, Utc};

use crate::batch::BatchReport;
use crate::window::SyncWindow;

/// The two network phases of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pushing unsynced records.
    Upload,
    /// Pulling canonical copies.
    Synchronize,
}

/// Result of one completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// The window this pass selected records from.
    pub window: SyncWindow,
    /// Upload phase tally (empty when nothing was pending).
    pub upload: BatchReport,
    /// Synchronize phase tally (empty when the window was empty).
    pub synchronize: BatchReport,
}

impl PassReport {
    /// True when every chunk of both phases committed.
    pub fn is_converged(&self) -> bool {
        self.upload.is_complete() && self.synchronize.is_complete()
    }
}

/// Observable sync state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// An upload call is in flight.
    pub uploading: bool,
    /// A synchronize call is in flight.
    pub synchronizing: bool,
    /// Completed passes (successful or not).
    pub passes: u64,
    /// When the last pass finished.
    pub last_run_at: Option<DateTime<Utc>>,
    /// Report of the last pass that completed without a local error.
    pub last_report: Option<PassReport>,
    /// Local error that ended the last pass, if any.
    pub last_error: Option<String>,
}

impl SyncStatus {
    /// Create an idle status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Any network phase in flight.
    pub fn loading(&self) -> bool {
        self.uploading || self.synchronizing
    }

    /// A phase started.
    pub fn begin(&mut self, phase: Phase) {
        self.set(phase, true);
    }

    /// A phase ended, however it ended.
    pub fn end(&mut self, phase: Phase) {
        self.set(phase, false);
    }

    /// A pass completed.
    pub fn record_pass(&mut self, report: PassReport, at: DateTime<Utc>) {
        self.passes += 1;
        self.last_run_at = Some(at);
        self.last_report = Some(report);
        self.last_error = None;
    }

    /// A pass was cut short by a local error.
    pub fn record_failure(&mut self, error: String, at: DateTime<Utc>) {
        self.passes += 1;
        self.last_run_at = Some(at);
        self.last_error = Some(error);
    }

    fn set(&mut self, phase: Phase, active: bool) {
        match phase {
            Phase::Upload => self.uploading = active,
            Phase::Synchronize => self.synchronizing = active,
        }
    }
}
