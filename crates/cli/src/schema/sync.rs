// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use schemars::JsonSchema;
use serde::Serialize;

use super::ActionJson;

/// JSON output of `ireport sync -o json`.
#[derive(JsonSchema, Serialize)]
pub struct SyncOutputJson {
    /// Whether the API was reachable; nothing is sent while offline.
    pub online: bool,
    /// Actions delivered and removed from the queue.
    pub replayed: usize,
    /// Actions that failed and stay queued.
    pub failed: usize,
    /// Actions the server rejected for good and that were dropped.
    pub evicted: Vec<ActionJson>,
    /// Whether the server rejected the stored token.
    pub auth_required: bool,
    /// Actions still queued after the pass.
    pub pending: usize,
}
