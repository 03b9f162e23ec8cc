//! # sync-core
//!
//! Pure logic for recsync (no I/O, instant tests).
//!
//! This crate holds the parts of a sync pass that do not touch the network
//! or the disk:
//! - [`SyncWindow`] / [`RecordFilter`] - which records a pass selects
//! - [`run_batches`] - sequential, failure-isolated chunk submission
//! - [`SyncStatus`] / [`PassReport`] - observable pass bookkeeping
//!
//! The actual I/O (remote calls, store writes) is performed by `sync-client`,
//! which plugs its handlers into the batcher.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod status;
pub mod window;

pub use batch::{chunk_count, run_batches, BatchReport, ChunkOutcome};
pub use status::{PassReport, Phase, SyncStatus};
pub use window::{RecordFilter, SyncWindow, DEFAULT_RANGE_MONTHS};
