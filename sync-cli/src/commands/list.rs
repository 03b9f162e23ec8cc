//! List records in the current sync window.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use recsync_client::RecordStore;
use recsync_core::{RecordFilter, SyncWindow};
use recsync_types::Record;
use std::path::Path;

use super::{load_config, open_store};
use crate::config::Config;

/// Current window for a config.
pub fn current_window(config: &Config, now: DateTime<Utc>) -> Result<SyncWindow> {
    SyncWindow::ending_at(now, config.sync.range_months)
        .context("Configured range_months is out of range")
}

/// Run the list command. Returns the listed records.
pub async fn run(data_dir: &Path, pending_only: bool) -> Result<Vec<Record>> {
    let config = load_config(data_dir).await?;
    let store = open_store(data_dir, &config).await?;

    let window = current_window(&config, Utc::now())?;
    let filter = if pending_only {
        RecordFilter::pending_upload(window)
    } else {
        RecordFilter::in_window(window)
    };
    let records = store.find(&filter).await?;

    if records.is_empty() {
        println!("No records.");
        return Ok(records);
    }

    for record in &records {
        let marker = if record.synced { "synced " } else { "pending" };
        println!(
            "{}  {}  #{:<3} {:<20} {}",
            marker,
            record.date.format("%Y-%m-%d %H:%M"),
            record.rank,
            record.hero.name,
            record.id
        );
    }
    println!();
    println!("{} record(s)", records.len());

    Ok(records)
}
