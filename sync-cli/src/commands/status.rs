//! Show sync status.

use anyhow::Result;
use chrono::Utc;
use recsync_client::RecordStore;
use recsync_core::RecordFilter;
use recsync_types::Record;
use std::path::Path;

use super::list::current_window;
use super::open_store;
use crate::config::Config;

/// Counts for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounts {
    /// Records in the window.
    pub total: usize,
    /// Of which not yet uploaded.
    pub pending: usize,
}

impl WindowCounts {
    /// Count one snapshot of the window.
    pub fn of(records: &[Record]) -> Self {
        Self {
            total: records.len(),
            pending: records.iter().filter(|r| !r.synced).count(),
        }
    }

    /// Records already uploaded.
    pub fn synced(&self) -> usize {
        self.total - self.pending
    }
}

/// Run the status command. Returns `None` when not initialized.
pub async fn run(data_dir: &Path) -> Result<Option<WindowCounts>> {
    println!("=== recsync status ===");
    println!();

    if !Config::exists(data_dir) {
        println!("NOT INITIALIZED");
        println!();
        println!("Run 'recsync init' to initialize.");
        return Ok(None);
    }
    let config = Config::load(data_dir).await?;

    println!("Remote:");
    println!("  URL:  {}", config.remote.base_url);
    if config.is_authenticated() {
        println!("  Auth: logged in");
    } else {
        println!("  Auth: LOGGED OUT (sync paused)");
    }
    println!();

    let store = open_store(data_dir, &config).await?;
    let window = current_window(&config, Utc::now())?;
    let counts = WindowCounts::of(&store.find(&RecordFilter::in_window(window)).await?);

    println!("Records (last {} months):", config.sync.range_months);
    println!("  Synced:  {}", counts.synced());
    println!("  Pending: {}", counts.pending);
    println!("  Database: {}", config.database_path(data_dir).display());

    Ok(Some(counts))
}
