//! Authentication signal.
//!
//! Whether network sync is currently permitted. Readable at any time and
//! observable through a [`watch`] channel; only actual transitions wake
//! subscribers.

use std::sync::Arc;
use tokio::sync::watch;

/// Shared, observable "signed in" flag.
///
/// Cloning yields another handle to the same flag.
#[derive(Debug, Clone)]
pub struct AuthSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl AuthSignal {
    /// Create a signal with the given initial state.
    pub fn new(authenticated: bool) -> Self {
        let (tx, _rx) = watch::channel(authenticated);
        Self { tx: Arc::new(tx) }
    }

    /// Whether sync is currently permitted.
    pub fn is_authenticated(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the state. Subscribers are only notified on an actual change.
    pub fn set(&self, authenticated: bool) {
        self.tx.send_if_modified(|current| {
            if *current == authenticated {
                false
            } else {
                *current = authenticated;
                true
            }
        });
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for AuthSignal {
    fn default() -> Self {
        Self::new(false)
    }
}
