//! # sync-types
//!
//! Record and wire types for recsync.
//!
//! This crate provides the foundational types used across all recsync crates:
//! - [`Record`], [`Hero`], [`RecordId`] - The locally persisted unit of sync
//! - [`UploadRecord`], [`HeroRef`] - The projection accepted by the upload endpoint
//! - [`UploadRequest`], [`SynchronizeRequest`], ... - Remote API bodies
//! - [`SyncError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod messages;
mod record;

pub use error::SyncError;
pub use ids::RecordId;
pub use messages::{SynchronizeRequest, SynchronizeResponse, UploadAck, UploadRequest};
pub use record::{Hero, HeroRef, Record, UploadRecord};
