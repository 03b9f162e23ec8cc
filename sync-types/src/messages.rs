//! Request and response bodies for the remote sync API.
//!
//! Both endpoints take and return JSON:
//! - `POST /records/upload` with [`UploadRequest`], answered by [`UploadAck`]
//! - `POST /records/synchronize` with [`SynchronizeRequest`], answered by
//!   [`SynchronizeResponse`]

use serde::{Deserialize, Serialize};

use crate::{Record, RecordId, SyncError, UploadRecord};

/// Push a chunk of unsynced records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Records to store. Re-uploading a known id is a no-op on the server.
    pub records: Vec<UploadRecord>,
}

/// Server acknowledgment of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAck {
    /// Whether the server durably accepted the whole chunk.
    pub ok: bool,
}

/// Request the canonical copies of a chunk of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynchronizeRequest {
    /// Records to fetch.
    pub ids: Vec<RecordId>,
}

/// Canonical copies held by the server.
///
/// Ids unknown to the server are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynchronizeResponse {
    /// Server-side records.
    pub records: Vec<Record>,
}

impl SynchronizeResponse {
    /// Parse a response body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SyncError> {
        serde_json::from_slice(bytes).map_err(SyncError::Deserialization)
    }
}
