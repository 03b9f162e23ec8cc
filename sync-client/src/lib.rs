//! # sync-client
//!
//! Runs bidirectional record sync between a local store and a remote API.
//!
//! ## Pieces
//!
//! - [`SyncOrchestrator`]: one pass (upload pending, then pull canonical copies)
//! - [`spawn_trigger`]: debounced, auth-driven and periodic scheduling of passes
//! - [`RecordStore`]: local persistence ([`SqliteStore`], [`MemoryStore`])
//! - [`RemoteSync`]: the server side ([`HttpRemote`], [`MockRemote`])
//! - [`AuthSignal`]: gates every pass
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use recsync_client::{spawn_trigger, AuthSignal, MockRemote, SqliteStore, SyncConfig, SyncOrchestrator};
//!
//! let store = SqliteStore::open(path).await?;
//! let auth = AuthSignal::new(true);
//! let orchestrator = Arc::new(SyncOrchestrator::new(SyncConfig::default(), store, MockRemote::new(), auth));
//!
//! let trigger = spawn_trigger(orchestrator.clone());
//! trigger.request();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod orchestrator;
pub mod remote;
pub mod store;
pub mod trigger;

pub use auth::AuthSignal;
pub use orchestrator::{
    ClientError, RecordsChanged, SyncConfig, SyncOrchestrator, DEFAULT_DEBOUNCE,
    DEFAULT_HEARTBEAT, SYNCHRONIZE_CHUNK_SIZE, UPLOAD_CHUNK_SIZE,
};
pub use remote::{HttpRemote, HttpRemoteConfig, MockRemote, RemoteError, RemoteSync};
pub use store::{MemoryStore, RecordStore, SqliteStore, StoreError};
pub use trigger::{spawn_trigger, SyncTrigger, TriggerHandle};
