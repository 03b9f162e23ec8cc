//! Keep syncing in the background until stopped.

use anyhow::{Context, Result};
use recsync_client::{
    spawn_trigger, AuthSignal, HttpRemote, MockRemote, RemoteSync, SqliteStore, SyncConfig,
    SyncOrchestrator,
};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use super::sync::print_report;
use super::{load_config, open_store};

/// Run the watch command until Ctrl-C.
pub async fn run(data_dir: &Path, mock: bool) -> Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };
    watch_until(data_dir, mock, shutdown).await?;

    println!();
    println!("Stopped.");
    Ok(())
}

/// Run the trigger policy until `shutdown` completes. Returns the number of
/// passes that ran.
pub async fn watch_until(
    data_dir: &Path,
    mock: bool,
    shutdown: impl Future<Output = ()>,
) -> Result<u64> {
    let config = load_config(data_dir).await?;
    let store = open_store(data_dir, &config).await?;
    let auth = AuthSignal::new(config.is_authenticated());

    if !config.is_authenticated() {
        println!("Not logged in: waiting without syncing.");
    }

    if mock {
        println!("Using mock remote (no network)");
        watch(config.sync_config(), store, MockRemote::new(), auth, shutdown).await
    } else {
        let remote = HttpRemote::new(config.remote_config())
            .context("Failed to create HTTP client")?;
        watch(config.sync_config(), store, remote, auth, shutdown).await
    }
}

async fn watch<R: RemoteSync + 'static>(
    config: SyncConfig,
    store: SqliteStore,
    remote: R,
    auth: AuthSignal,
    shutdown: impl Future<Output = ()>,
) -> Result<u64> {
    let heartbeat = config.heartbeat;
    let orchestrator = Arc::new(SyncOrchestrator::new(config, store, remote, auth));
    let mut status = orchestrator.status();
    let mut refresh = orchestrator.subscribe_refresh();

    let handle = spawn_trigger(orchestrator.clone());
    if heartbeat.is_zero() {
        println!("Watching. Press Ctrl+C to stop.");
    } else {
        println!(
            "Watching (sync every {} min). Press Ctrl+C to stop.",
            heartbeat.as_secs() / 60
        );
    }

    tokio::pin!(shutdown);
    let mut seen = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Ok(changed) = refresh.recv() => {
                tracing::debug!("{} records refreshed", changed.count);
            }
            Ok(()) = status.changed() => {
                let current = status.borrow_and_update().clone();
                if current.passes > seen {
                    seen = current.passes;
                    println!();
                    match (&current.last_error, &current.last_report) {
                        (Some(error), _) => println!("Pass failed: {}", error),
                        (None, Some(report)) => print_report(report),
                        (None, None) => {}
                    }
                }
            }
        }
    }

    handle.shutdown();
    let passes = orchestrator.status().borrow().passes;
    Ok(passes)
}
