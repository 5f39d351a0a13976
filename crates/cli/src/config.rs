// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `config.toml` inside the state directory and
//! includes:
//! - `[api]`: where the reporting API lives and how long to wait for it
//! - `[sync]`: how often to sync and probe connectivity
//! - `store`: optional path to the key-value store database
//!
//! Every field has a default, so a missing file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const STATE_DIR_NAME: &str = "ireport";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "store.db";
const LOCK_FILE_NAME: &str = "queue.lock";
const LOG_FILE_NAME: &str = "sync.log";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Reporting API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Synchronizer settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Optional path for the store (relative to the state directory or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

/// Reporting API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the reporting API (default: "http://localhost:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds (default: 10000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Synchronizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between periodic sync passes while online (default: 60).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Seconds between connectivity probes in `watch` (default: 5).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Max time to wait for a connectivity probe in milliseconds (default: 3000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Drop actions the server rejects as invalid instead of retrying them (default: true).
    #[serde(default = "default_evict_permanent_failures")]
    pub evict_permanent_failures: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            interval_secs: default_interval_secs(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            evict_permanent_failures: default_evict_permanent_failures(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_interval_secs() -> u64 {
    60
}

fn default_probe_interval_secs() -> u64 {
    5
}

fn default_probe_timeout_ms() -> u64 {
    3_000
}

fn default_evict_permanent_failures() -> bool {
    true
}

impl Config {
    /// Loads configuration from the given state directory.
    ///
    /// A missing `config.toml` yields the defaults.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make the synchronizer spin or never time out.
    pub fn validate(&self) -> Result<()> {
        crate::sync::parse_base_url(&self.api.base_url)?;
        for (name, value) in [
            ("api.timeout_ms", self.api.timeout_ms),
            ("sync.interval_secs", self.sync.interval_secs),
            ("sync.probe_interval_secs", self.sync.probe_interval_secs),
            ("sync.probe_timeout_ms", self.sync.probe_timeout_ms),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    /// Applies environment overrides (`IREPORT_API_URL`).
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env::api_url() {
            self.api.base_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync.interval_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.sync.probe_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.sync.probe_timeout_ms)
    }
}

/// Resolve the state directory: explicit path, then `IREPORT_STATE_DIR`,
/// then the platform data directory.
pub fn resolve_state_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::state_dir() {
        return Ok(path);
    }
    dirs::data_dir()
        .map(|dir| dir.join(STATE_DIR_NAME))
        .ok_or(Error::NoStateDir)
}

/// Get the store path from config.
pub fn get_store_path(state_dir: &Path, config: &Config) -> PathBuf {
    match &config.store {
        Some(store) => {
            let store_path = Path::new(store);
            if store_path.is_absolute() {
                store_path.to_path_buf()
            } else {
                state_dir.join(store_path)
            }
        }
        None => state_dir.join(STORE_FILE_NAME),
    }
}

/// Get the path of the lock file shared by all processes using this state directory.
pub fn get_lock_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOCK_FILE_NAME)
}

/// Get the path of the `watch` log file.
pub fn get_log_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
