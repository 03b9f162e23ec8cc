//! # recsync
//!
//! CLI for recsync: keeps a local record database in step with a remote
//! sync API.
//!
//! ## Commands
//!
//! - `init`: Create config and database
//! - `login` / `logout`: Set or clear the API token
//! - `add`: Create a local record
//! - `list`: List records in the sync window
//! - `sync`: Run one sync pass
//! - `watch`: Sync on startup, on a heartbeat, until Ctrl+C
//! - `status`: Show auth state and pending counts
//!
//! ## Example
//!
//! ```bash
//! recsync init --base-url https://api.example.com/v1
//! recsync login --token "$TOKEN"
//! recsync add --hero-id npc_dota_hero_axe --hero-name Axe --rank 1
//! recsync sync
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::add::NewRecord;
use commands::{add, init, list, login, status, sync, watch};

/// Bidirectional record sync.
#[derive(Parser, Debug)]
#[command(name = "recsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for config and the record database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log filter when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create config and database
    Init {
        /// Remote sync API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Store an API token (enables sync)
    Login {
        /// Bearer token
        #[arg(long, short)]
        token: String,
    },

    /// Remove the API token (pauses sync)
    Logout,

    /// Create a local record
    Add {
        /// Hero identifier
        #[arg(long)]
        hero_id: String,

        /// Hero display name
        #[arg(long)]
        hero_name: String,

        /// Placement
        #[arg(long)]
        rank: u32,

        /// Free-text note
        #[arg(long)]
        remark: Option<String>,

        /// When it happened (RFC 3339, default: now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List records in the sync window
    List {
        /// Only records not yet uploaded
        #[arg(long)]
        pending: bool,
    },

    /// Run one sync pass
    Sync {
        /// Use an in-process mock remote instead of the HTTP API
        #[arg(long)]
        mock: bool,
    },

    /// Keep syncing until Ctrl+C
    Watch {
        /// Use an in-process mock remote instead of the HTTP API
        #[arg(long)]
        mock: bool,
    },

    /// Show auth state and pending counts
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    match cli.command {
        Commands::Init { base_url } => {
            init::run(&data_dir, base_url.as_deref()).await?;
        }
        Commands::Login { token } => {
            login::login(&data_dir, &token).await?;
        }
        Commands::Logout => {
            login::logout(&data_dir).await?;
        }
        Commands::Add {
            hero_id,
            hero_name,
            rank,
            remark,
            date,
        } => {
            let new = NewRecord {
                hero_id,
                hero_name,
                rank,
                remark,
                date,
            };
            add::run(&data_dir, new).await?;
        }
        Commands::List { pending } => {
            list::run(&data_dir, pending).await?;
        }
        Commands::Sync { mock } => {
            sync::run(&data_dir, mock).await?;
        }
        Commands::Watch { mock } => {
            watch::run(&data_dir, mock).await?;
        }
        Commands::Status => {
            status::run(&data_dir).await?;
        }
    }

    Ok(())
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Get the default data directory for recsync.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "ydun", "recsync")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
