// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use crate::schema::{pending, status, sync};
use ireport_core::StoredQueue;

#[test]
fn test_schema_queue_describes_stored_document() {
    let schema = schemars::schema_for!(StoredQueue);
    let json = serde_json::to_string(&schema).unwrap();

    assert!(json.contains("\"$schema\""));
    assert!(json.contains("\"version\""));
    assert!(json.contains("\"StoredRecord\""));
    assert!(json.contains("\"enqueued_at\""));
    // DateTime should produce format: date-time
    assert!(json.contains("\"date-time\""));
}

#[test]
fn test_schema_pending_produces_valid_json() {
    let schema = schemars::schema_for!(pending::PendingOutputJson);
    let json = serde_json::to_string_pretty(&schema).unwrap();

    assert!(json.contains("\"PendingOutputJson\""));
    assert!(json.contains("\"count\""));
    assert!(json.contains("\"ActionJson\""));
}

#[test]
fn test_schema_status_includes_connectivity() {
    let schema = schemars::schema_for!(status::StatusOutputJson);
    let json = serde_json::to_string(&schema).unwrap();

    assert!(json.contains("\"ConnectivityJson\""));
    assert!(json.contains("\"is_internet_reachable\""));
    assert!(json.contains("\"authenticated\""));
}

#[test]
fn test_schema_sync_has_required_fields() {
    let schema = schemars::schema_for!(sync::SyncOutputJson);
    let json = serde_json::to_string(&schema).unwrap();

    assert!(json.contains("\"required\""));
    assert!(json.contains("\"replayed\""));
    assert!(json.contains("\"evicted\""));
    assert!(json.contains("\"auth_required\""));
}
