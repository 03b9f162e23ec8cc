//! Configuration for recsync.
//!
//! Stored as `recsync.toml` in the data directory. Every field has a default,
//! so a partial file (or an empty section) is valid.

use recsync_client::{HttpRemoteConfig, SyncConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "recsync.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote sync API.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Pass tuning.
    #[serde(default)]
    pub sync: SyncSection,
    /// Local record store.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote sync API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token. Present means logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pass tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSection {
    /// Window length in calendar months (default: 2).
    #[serde(default = "default_range_months")]
    pub range_months: u32,
    /// Records per upload call (default: 30).
    #[serde(default = "default_upload_chunk_size")]
    pub upload_chunk_size: usize,
    /// Ids per synchronize call (default: 1000).
    #[serde(default = "default_synchronize_chunk_size")]
    pub synchronize_chunk_size: usize,
    /// Debounce wait in milliseconds (default: 300).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Heartbeat period in seconds, 0 disables it (default: 1800).
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path, relative to the data directory unless absolute.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_range_months() -> u32 {
    recsync_core::DEFAULT_RANGE_MONTHS
}

fn default_upload_chunk_size() -> usize {
    recsync_client::UPLOAD_CHUNK_SIZE
}

fn default_synchronize_chunk_size() -> usize {
    recsync_client::SYNCHRONIZE_CHUNK_SIZE
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_heartbeat_secs() -> u64 {
    30 * 60 // 30 minutes
}

fn default_database_path() -> PathBuf {
    PathBuf::from("records.db")
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            range_months: default_range_months(),
            upload_chunk_size: default_upload_chunk_size(),
            synchronize_chunk_size: default_synchronize_chunk_size(),
            debounce_ms: default_debounce_ms(),
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
        }
    }
}

impl Config {
    /// Path of the config file in a data directory.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Check if a data directory has been initialized.
    pub fn exists(data_dir: &Path) -> bool {
        Self::path(data_dir).exists()
    }

    /// Load the configuration from a data directory.
    pub async fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(data_dir);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::ReadError {
                path: path.clone(),
                source: e,
            })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError { path, source: e })
    }

    /// Save the configuration (owner read/write only, it may hold a token).
    pub async fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path(data_dir);
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| ConfigError::WriteError {
                path: path.clone(),
                source: e,
            })?;
        set_file_permissions_0600(&path)
            .await
            .map_err(|e| ConfigError::WriteError { path, source: e })
    }

    /// Whether a token is configured.
    pub fn is_authenticated(&self) -> bool {
        self.remote.token.is_some()
    }

    /// Absolute database path for a data directory.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.storage.database)
    }

    /// Pass tuning for the orchestrator.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default()
            .with_range_months(self.sync.range_months)
            .with_chunk_sizes(
                self.sync.upload_chunk_size,
                self.sync.synchronize_chunk_size,
            )
            .with_debounce(Duration::from_millis(self.sync.debounce_ms))
            .with_heartbeat(Duration::from_secs(self.sync.heartbeat_secs))
    }

    /// HTTP remote settings.
    pub fn remote_config(&self) -> HttpRemoteConfig {
        let config = HttpRemoteConfig::new(&self.remote.base_url)
            .with_timeout(Duration::from_secs(self.remote.timeout_secs));
        match &self.remote.token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// Failed to write configuration file.
    #[error("failed to write config file {path}: {source}")]
    WriteError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to encode the configuration.
    #[error("failed to encode config: {0}")]
    EncodeError(#[from] toml::ser::Error),
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

/// Set directory permissions to 0700 (owner only) on Unix.
/// No-op on non-Unix platforms.
pub async fn set_dir_permissions_0700(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700)).await?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
