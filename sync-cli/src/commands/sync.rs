//! Run a single sync pass.

use anyhow::{Context, Result};
use chrono::Utc;
use recsync_client::{
    AuthSignal, HttpRemote, MockRemote, RemoteSync, SqliteStore, SyncConfig, SyncOrchestrator,
};
use recsync_core::PassReport;
use std::path::Path;

use super::{load_config, open_store};

/// Run the sync command. Returns the pass report, `None` if not logged in.
pub async fn run(data_dir: &Path, mock: bool) -> Result<Option<PassReport>> {
    let config = load_config(data_dir).await?;
    let store = open_store(data_dir, &config).await?;
    let auth = AuthSignal::new(config.is_authenticated());

    let report = if mock {
        println!("Using mock remote (no network)");
        pass(config.sync_config(), store, MockRemote::new(), auth).await?
    } else {
        let remote = HttpRemote::new(config.remote_config())
            .context("Failed to create HTTP client")?;
        pass(config.sync_config(), store, remote, auth).await?
    };

    match &report {
        Some(report) => print_report(report),
        None => println!("Not logged in. Run 'recsync login --token <token>' first."),
    }

    Ok(report)
}

async fn pass<R: RemoteSync>(
    config: SyncConfig,
    store: SqliteStore,
    remote: R,
    auth: AuthSignal,
) -> Result<Option<PassReport>> {
    let orchestrator = SyncOrchestrator::new(config, store, remote, auth);
    orchestrator
        .run_pass(Utc::now())
        .await
        .context("Sync pass failed")
}

/// Print a pass report.
pub fn print_report(report: &PassReport) {
    let upload = &report.upload;
    let synchronize = &report.synchronize;

    println!(
        "Window: {} .. {}",
        report.window.start().format("%Y-%m-%d"),
        report.window.end().format("%Y-%m-%d")
    );
    println!(
        "  Upload:      {} record(s) in {} call(s), {} failed",
        upload.items_committed, upload.chunks, upload.items_failed
    );
    println!(
        "  Synchronize: {} record(s) in {} call(s), {} failed",
        synchronize.items_committed, synchronize.chunks, synchronize.items_failed
    );
    if report.is_converged() {
        println!("Up to date.");
    } else {
        println!("Some chunks failed; they will be retried on the next pass.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, NewRecord};
    use crate::commands::{init, list, login};
    use tempfile::tempdir;

    fn new_record(rank: u32) -> NewRecord {
        NewRecord {
            hero_id: "h-9".to_string(),
            hero_name: "Pudge".to_string(),
            rank,
            remark: None,
            date: None,
        }
    }

    #[tokio::test]
    async fn mock_sync_uploads_pending_records() {
        let dir = tempdir().unwrap();
        init::run(dir.path(), None).await.unwrap();
        login::login(dir.path(), "tok").await.unwrap();
        for rank in 1..=3 {
            add::run(dir.path(), new_record(rank)).await.unwrap();
        }

        let report = run(dir.path(), true).await.unwrap().unwrap();

        assert_eq!(report.upload.items_committed, 3);
        assert_eq!(report.synchronize.items_committed, 3);
        assert!(report.is_converged());
        assert!(list::run(dir.path(), true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sync_without_login_touches_nothing() {
        let dir = tempdir().unwrap();
        init::run(dir.path(), None).await.unwrap();
        add::run(dir.path(), new_record(1)).await.unwrap();

        assert!(run(dir.path(), true).await.unwrap().is_none());
        assert_eq!(list::run(dir.path(), true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_remote_leaves_records_pending() {
        let dir = tempdir().unwrap();
        init::run(dir.path(), Some("http://127.0.0.1:9")).await.unwrap();
        login::login(dir.path(), "tok").await.unwrap();
        add::run(dir.path(), new_record(1)).await.unwrap();

        let report = run(dir.path(), false).await.unwrap().unwrap();

        assert_eq!(report.upload.failed, 1);
        assert!(!report.is_converged());
        assert_eq!(list::run(dir.path(), true).await.unwrap().len(), 1);
    }
}
