//! CLI command implementations.

pub mod add;
pub mod init;
pub mod list;
pub mod login;
pub mod status;
pub mod sync;
pub mod watch;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use recsync_client::SqliteStore;

/// Load the config of an initialized data directory.
pub async fn load_config(data_dir: &Path) -> Result<Config> {
    if !Config::exists(data_dir) {
        anyhow::bail!("Not initialized. Run 'recsync init' first.");
    }
    Ok(Config::load(data_dir).await?)
}

/// Open the record database named by the config.
pub async fn open_store(data_dir: &Path, config: &Config) -> Result<SqliteStore> {
    let path = config.database_path(data_dir);
    SqliteStore::open(&path)
        .await
        .with_context(|| format!("Failed to open database {}", path.display()))
}
