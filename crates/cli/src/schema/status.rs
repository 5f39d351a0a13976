// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use schemars::JsonSchema;
use serde::Serialize;

/// JSON output of `ireport status -o json`.
#[derive(JsonSchema, Serialize)]
pub struct StatusOutputJson {
    /// State directory in use.
    pub state_dir: String,
    /// Base URL of the reporting API.
    pub api_url: String,
    /// Result of a connectivity probe against the API host.
    pub connectivity: ConnectivityJson,
    /// Whether an API token is stored.
    pub authenticated: bool,
    /// Number of queued actions.
    pub pending: usize,
}

/// Connectivity as observed by a probe.
#[derive(JsonSchema, Serialize)]
pub struct ConnectivityJson {
    /// The API host name resolved.
    pub is_connected: bool,
    /// The API host accepted a connection.
    pub is_internet_reachable: bool,
    /// Both of the above.
    pub online: bool,
}

impl From<crate::sync::ConnectivityState> for ConnectivityJson {
    fn from(state: crate::sync::ConnectivityState) -> Self {
        ConnectivityJson {
            is_connected: state.is_connected,
            is_internet_reachable: state.is_internet_reachable,
            online: state.is_online(),
        }
    }
}
