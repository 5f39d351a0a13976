// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::sync::test_helpers::{make_comment, make_incident};
use crate::sync::{ApiError, Call};
use ireport_core::{keys, KeyValueStore};

#[tokio::test]
async fn test_offline_sends_nothing() {
    let ctx = TestContext::new();
    ctx.queue(make_comment("42", "test")).await;

    let summary = run_impl(&ctx.sync, ConnectivityState::OFFLINE)
        .await
        .unwrap();

    assert!(!summary.online);
    assert_eq!(summary.pending, 1);
    assert!(ctx.api.calls().is_empty());
    assert_eq!(
        render_text(&summary),
        "Offline: nothing sent, 1 action(s) still pending\n"
    );
}

#[tokio::test]
async fn test_online_replays_in_order() {
    let ctx = TestContext::new();
    ctx.queue(make_incident("Spill")).await;
    ctx.queue(make_comment("42", "test")).await;

    let summary = run_impl(&ctx.sync, ConnectivityState::ONLINE)
        .await
        .unwrap();

    assert_eq!(summary.replayed, 2);
    assert_eq!(summary.pending, 0);
    assert_eq!(
        ctx.api.calls(),
        vec![
            Call::CreateIncident {
                title: "Spill".into()
            },
            Call::CreateComment {
                incident_id: "42".into(),
                content: "test".into()
            },
        ]
    );
    assert_eq!(render_text(&summary), "Synced 2 action(s), 0 pending\n");
}

#[tokio::test]
async fn test_failures_and_evictions_are_reported() {
    let ctx = TestContext::new();
    ctx.api.fail_on("flaky", ApiError::Transient("503".into()));
    ctx.api.fail_on(
        "spam",
        ApiError::Validation {
            status: 422,
            message: "content rejected".into(),
        },
    );
    ctx.queue(make_comment("1", "flaky")).await;
    let rejected = ctx.queue(make_comment("1", "spam")).await;
    ctx.queue(make_comment("1", "fine")).await;

    let summary = run_impl(&ctx.sync, ConnectivityState::ONLINE)
        .await
        .unwrap();

    assert_eq!(summary.replayed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.evicted.len(), 1);
    assert_eq!(summary.evicted[0].0.id, rejected.id);

    let text = render_text(&summary);
    assert!(text.starts_with("Synced 1 action(s), 1 failed, 1 pending\n"));
    assert!(text.contains("Dropped "));
    assert!(text.contains("comment on 1: spam"));

    let json: serde_json::Value = serde_json::from_str(&render_json(&summary).unwrap()).unwrap();
    assert_eq!(json["evicted"][0]["id"], rejected.id.to_string());
    assert_eq!(json["failed"], 1);
}

#[tokio::test]
async fn test_rejected_token_asks_for_login() {
    let ctx = TestContext::new();
    ctx.store.set(keys::AUTH_TOKEN, "stale").unwrap();
    ctx.api.fail_on("a", ApiError::Unauthorized);
    ctx.queue(make_comment("1", "a")).await;
    ctx.queue(make_comment("1", "b")).await;

    let summary = run_impl(&ctx.sync, ConnectivityState::ONLINE)
        .await
        .unwrap();

    assert!(summary.auth_required);
    assert_eq!(summary.pending, 2);
    assert_eq!(ctx.api.calls().len(), 1);
    assert_eq!(ctx.store.get(keys::AUTH_TOKEN).unwrap(), None);
    assert!(render_text(&summary).contains("ireport login"));
}

#[tokio::test]
async fn test_json_output_shape() {
    let ctx = TestContext::new();
    let summary = run_impl(&ctx.sync, ConnectivityState::ONLINE)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_json(&summary).unwrap()).unwrap();

    assert_eq!(json["online"], true);
    assert_eq!(json["replayed"], 0);
    assert_eq!(json["evicted"], serde_json::json!([]));
    assert_eq!(json["auth_required"], false);
    assert_eq!(json["pending"], 0);
}
