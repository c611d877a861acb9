//! Configuration management for depstash
//!
//! Optional TOML file with store and state locations; CLI flags override
//! whatever is configured here.

use crate::error::{StashError, StashResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub state: StateConfig,
}

/// Artifact store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory of the local artifact store
    pub dir: Option<PathBuf>,
}

/// Persisted state settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Path of the per-job state file
    pub file: Option<PathBuf>,
}

impl Config {
    /// Default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("depstash")
            .join("config.toml")
    }

    /// Load configuration from the given path, or the default location.
    /// A missing file yields the defaults.
    pub async fn load(path: Option<&Path>) -> StashResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            debug!("config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| StashError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| StashError::ConfigInvalid {
            path,
            reason: e.to_string(),
        })
    }

    /// Resolved store root: configured value or the platform cache dir
    pub fn store_dir(&self) -> PathBuf {
        self.store.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("depstash")
                .join("store")
        })
    }

    /// Resolved state file: configured value or the platform state dir
    pub fn state_file(&self) -> PathBuf {
        self.state.file.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("depstash")
                .join("state.json")
        })
    }
}
