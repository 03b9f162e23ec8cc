//! Set or clear the API token.
//!
//! A stored token is what makes the CLI "authenticated": passes only run
//! while one is present.

use anyhow::Result;
use std::path::Path;

use super::load_config;

/// Store a bearer token.
pub async fn login(data_dir: &Path, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Token must not be empty");
    }

    let mut config = load_config(data_dir).await?;
    config.remote.token = Some(token.to_string());
    config.save(data_dir).await?;

    println!("Logged in to {}", config.remote.base_url);
    Ok(())
}

/// Remove the stored token.
pub async fn logout(data_dir: &Path) -> Result<()> {
    let mut config = load_config(data_dir).await?;
    if config.remote.token.take().is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    config.save(data_dir).await?;

    println!("Logged out. Sync is paused until the next login.");
    Ok(())
}
