// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use schemars::JsonSchema;
use serde::Serialize;

use super::ActionJson;

/// JSON output of `ireport pending -o json`.
#[derive(JsonSchema, Serialize)]
pub struct PendingOutputJson {
    /// Number of queued actions.
    pub count: usize,
    /// Queued actions, oldest first.
    pub actions: Vec<ActionJson>,
}
