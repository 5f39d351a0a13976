// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Schema types for JSON output structures.
//!
//! These are separate from runtime types to allow schema-specific annotations
//! and to keep schemars out of the synchronizer itself.

use chrono::{DateTime, Utc};
use ireport_core::QueuedAction;
use schemars::JsonSchema;
use serde::Serialize;

use crate::error::Result;

pub mod pending;
pub mod status;
pub mod sync;

/// JSON representation of a queued action.
/// Used by pending output and sync eviction notices.
#[derive(JsonSchema, Serialize)]
pub struct ActionJson {
    /// Local identifier of the queued action.
    pub id: String,
    /// Action kind wire name.
    pub kind: String,
    /// One-line human-readable description.
    pub summary: String,
    /// When the action was queued.
    pub enqueued_at: DateTime<Utc>,
    /// Kind-specific payload as stored.
    pub payload: serde_json::Value,
}

impl ActionJson {
    /// Create an ActionJson from a queued action.
    pub fn new(queued: &QueuedAction) -> Result<Self> {
        let record = queued.to_record()?;
        Ok(ActionJson {
            id: record.id.to_string(),
            kind: record.kind,
            summary: queued.action.summary(),
            enqueued_at: record.enqueued_at,
            payload: record.payload,
        })
    }
}
