//! Initialize a data directory.

use anyhow::Result;
use std::path::Path;

use super::open_store;
use crate::config::{set_dir_permissions_0700, Config};

/// Run the init command.
pub async fn run(data_dir: &Path, base_url: Option<&str>) -> Result<()> {
    if Config::exists(data_dir) {
        anyhow::bail!(
            "Already initialized. Delete {} to reinitialize.",
            Config::path(data_dir).display()
        );
    }

    let mut config = Config::default();
    if let Some(url) = base_url {
        config.remote.base_url = url.to_string();
    }
    config.save(data_dir).await?;
    set_dir_permissions_0700(data_dir).await?;

    // Creates the database file and schema.
    open_store(data_dir, &config).await?;

    println!("Initialized successfully!");
    println!();
    println!("  Remote:   {}", config.remote.base_url);
    println!("  Database: {}", config.database_path(data_dir).display());
    println!("  Data dir: {}", data_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Log in: recsync login --token <token>");
    println!("  2. Add a record: recsync add --hero-id <id> --hero-name <name> --rank <n>");
    println!("  3. Sync: recsync sync");

    Ok(())
}
