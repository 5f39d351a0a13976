// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod pending;
pub mod queue;
pub mod schema;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ireport_core::{keys, KeyValueStore, SqliteStore};

use crate::config::{get_lock_path, get_store_path, resolve_state_dir, Config};
use crate::error::{Error, Result};
use crate::sync::{
    parse_base_url, probe, ConnectivityState, HttpApi, OfflineSync, ProbeTarget, SyncOptions,
};

/// The synchronizer as wired up by the CLI.
pub type Service = OfflineSync<Arc<SqliteStore>, HttpApi>;

/// Everything a command needs: where state lives, the config and the store.
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
    pub store: Arc<SqliteStore>,
}

impl Context {
    /// Resolve the state directory, load the config and open the store.
    pub fn open(state_dir: Option<&Path>) -> Result<Self> {
        let state_dir = resolve_state_dir(state_dir)?;
        let config = Config::load(&state_dir)?.with_env_overrides();
        config.validate()?;
        let store_path = get_store_path(&state_dir, &config);
        let store = SqliteStore::open(&store_path)?;
        tracing::debug!("opened store at {}", store_path.display());
        Ok(Context {
            state_dir,
            config,
            store: Arc::new(store),
        })
    }

    /// The stored API token, if signed in.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.store.get(keys::AUTH_TOKEN)?)
    }

    /// HTTP client for the configured API.
    ///
    /// The synchronizer hands it the stored token at the start of every pass.
    fn api(&self) -> Result<HttpApi> {
        HttpApi::new(&self.config.api.base_url, self.config.request_timeout())
    }

    /// Open the synchronizer over the shared store.
    ///
    /// The queue lock is always used since `watch` may be running alongside.
    pub fn service(&self) -> Result<Service> {
        let options = SyncOptions {
            evict_permanent_failures: self.config.sync.evict_permanent_failures,
            lock_file: Some(get_lock_path(&self.state_dir)),
        };
        Ok(OfflineSync::open(Arc::clone(&self.store), self.api()?, options)?)
    }

    /// Host and port connectivity probes are aimed at.
    pub fn probe_target(&self) -> Result<ProbeTarget> {
        let url = parse_base_url(&self.config.api.base_url)?;
        ProbeTarget::from_url(&url).ok_or_else(|| {
            Error::Config(format!("API URL '{}' has no host", self.config.api.base_url))
        })
    }

    /// Probe the API host once.
    pub async fn probe(&self) -> Result<ConnectivityState> {
        let target = self.probe_target()?;
        Ok(probe(&target, self.config.probe_timeout()).await)
    }
}
