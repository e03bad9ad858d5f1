//! Configuration loading for the arthropod survey services
//!
//! Per-value resolution priority:
//! 1. Environment variable (secrets usually arrive this way)
//! 2. TOML config file
//! 3. Compiled default

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the config file to load
pub const CONFIG_ENV_VAR: &str = "ASV_CONFIG";

/// What the sync coordinator does with staged records after a full
/// submission pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// Clear the staging store after every record has been attempted,
    /// regardless of per-record failures. Inherited default behavior;
    /// rejected records are discarded.
    #[default]
    BestEffort,
    /// Keep rejected records staged (in their original relative order)
    /// so the user can re-sync them.
    RetainRejected,
}

/// Remote tabular store (Airtable-style) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteStoreConfig {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub observation_table: String,
    /// Per-request timeout; a timed-out create is treated as rejected
    pub timeout_secs: u64,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_id: None,
            observation_table: "Observations".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Image host (Imgur) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageHostConfig {
    pub client_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            timeout_secs: 30,
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Path to the catalog TOML; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    pub sync_policy: SyncPolicy,
    pub remote_store: RemoteStoreConfig,
    pub image_host: ImageHostConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5810,
            catalog_path: None,
            sync_policy: SyncPolicy::default(),
            remote_store: RemoteStoreConfig::default(),
            image_host: ImageHostConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration, resolving the file path in priority order:
    /// explicit argument, then `ASV_CONFIG`, then the platform config dir
    /// (`<config_dir>/asv/asv-obs.toml`). A missing file falls back to
    /// compiled defaults; a present-but-invalid file is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(explicit_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
            None => {
                info!("No config directory available, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a specific TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Environment variables override file values (secrets in particular)
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ASV_AIRTABLE_API_KEY") {
            if key.trim().is_empty() {
                warn!("ASV_AIRTABLE_API_KEY is set but empty, ignoring");
            } else {
                self.remote_store.api_key = Some(key);
            }
        }
        if let Ok(base) = std::env::var("ASV_AIRTABLE_BASE_ID") {
            self.remote_store.base_id = Some(base);
        }
        if let Ok(table) = std::env::var("ASV_AIRTABLE_TABLE") {
            self.remote_store.observation_table = table;
        }
        if let Ok(client_id) = std::env::var("ASV_IMGUR_CLIENT_ID") {
            self.image_host.client_id = Some(client_id);
        }
        if let Ok(path) = std::env::var("ASV_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
    }

    /// Address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve the config file path without touching the filesystem beyond
/// existence checks.
fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("asv").join("asv-obs.toml"))
}
