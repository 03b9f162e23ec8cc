//! Remote sync API abstraction.
//!
//! Two idempotent calls:
//! - `upload()` pushes a chunk of unsynced records
//! - `synchronize()` fetches the canonical copies of a chunk of ids
//!
//! Retrying a whole chunk is always safe: the server treats a re-upload of a
//! known id as a no-op and synchronize is read-only.
//!
//! # Example
//!
//! ```ignore
//! let remote = MockRemote::new();
//! remote.upload(&chunk).await?;
//! let canonical = remote.synchronize(&ids).await?;
//! ```

mod http;
mod mock;

pub use http::{HttpRemote, HttpRemoteConfig};
pub use mock::MockRemote;

use async_trait::async_trait;
use recsync_types::{Record, RecordId, UploadRecord};
use thiserror::Error;

/// Remote call errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),

    /// The server refused the credentials.
    #[error("not authorized")]
    Unauthorized,

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The server answered but did not accept the upload.
    #[error("upload rejected by server")]
    Rejected,

    /// The call was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,
}

/// The remote side of a sync pass.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    /// Push a chunk of records. `Ok` means the server durably accepted all of them.
    async fn upload(&self, records: &[UploadRecord]) -> Result<(), RemoteError>;

    /// Fetch the canonical copies of the given records.
    ///
    /// Ids the server does not know are absent from the result.
    async fn synchronize(&self, ids: &[RecordId]) -> Result<Vec<Record>, RemoteError>;
}
