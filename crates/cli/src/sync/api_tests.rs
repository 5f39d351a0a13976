// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fake remote API and dispatch tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::*;
use crate::sync::test_helpers::*;
use yare::parameterized;

/// A remote call as seen by the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateIncident { title: String },
    CreateComment { incident_id: String, content: String },
    ToggleReaction { incident_id: String, reaction: ReactionType },
    UpdateProfile(ProfilePatch),
}

impl Call {
    /// The key failures are scripted against.
    fn subject(&self) -> String {
        match self {
            Call::CreateIncident { title } => title.clone(),
            Call::CreateComment { content, .. } => content.clone(),
            Call::ToggleReaction { incident_id, .. } => incident_id.clone(),
            Call::UpdateProfile(_) => "profile".to_string(),
        }
    }
}

/// Recording fake with scripted failures.
///
/// Failures are keyed by subject: the title of an incident, the content of a
/// comment, the incident id of a reaction, or `"profile"`.
#[derive(Clone, Default)]
pub struct FakeApi {
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<HashMap<String, ApiError>>>,
    next_id: Arc<AtomicUsize>,
    token: Arc<Mutex<Option<String>>>,
    sent_tokens: Arc<Mutex<Vec<Option<String>>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call for `subject` fails with `error` until cleared.
    pub fn fail_on(&self, subject: &str, error: ApiError) {
        self.failures
            .lock()
            .unwrap()
            .insert(subject.to_string(), error);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The token the next call would carry.
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    /// The token each call carried, in call order.
    pub fn sent_tokens(&self) -> Vec<Option<String>> {
        self.sent_tokens.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> ApiFuture<'_> {
        let subject = call.subject();
        let created = matches!(call, Call::CreateIncident { .. });
        self.calls.lock().unwrap().push(call);
        self.sent_tokens.lock().unwrap().push(self.token());
        let failure = self.failures.lock().unwrap().get(&subject).cloned();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;

        Box::pin(async move {
            // Yield so concurrent callers get a chance to interleave
            tokio::task::yield_now().await;
            match failure {
                Some(e) => Err(e),
                None => Ok(Replayed {
                    resource_id: created.then(|| format!("srv-{}", id)),
                }),
            }
        })
    }
}

impl RemoteApi for FakeApi {
    fn create_incident<'a>(&'a self, incident: &'a NewIncident) -> ApiFuture<'a> {
        self.record(Call::CreateIncident {
            title: incident.title.clone(),
        })
    }

    fn create_comment<'a>(&'a self, incident_id: &'a str, content: &'a str) -> ApiFuture<'a> {
        self.record(Call::CreateComment {
            incident_id: incident_id.to_string(),
            content: content.to_string(),
        })
    }

    fn toggle_reaction<'a>(
        &'a self,
        incident_id: &'a str,
        reaction: ReactionType,
    ) -> ApiFuture<'a> {
        self.record(Call::ToggleReaction {
            incident_id: incident_id.to_string(),
            reaction,
        })
    }

    fn update_profile<'a>(&'a self, patch: &'a ProfilePatch) -> ApiFuture<'a> {
        self.record(Call::UpdateProfile(patch.clone()))
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

#[tokio::test]
async fn test_dispatch_routes_each_kind() {
    let api = FakeApi::new();
    let actions = [
        make_incident("Flooded basement"),
        make_comment("42", "test"),
        make_reaction("7", ReactionType::Concerned),
        make_profile_update("hello"),
    ];

    for action in &actions {
        dispatch(&api, action).unwrap().await.unwrap();
    }

    assert_eq!(
        api.calls(),
        vec![
            Call::CreateIncident {
                title: "Flooded basement".into()
            },
            Call::CreateComment {
                incident_id: "42".into(),
                content: "test".into()
            },
            Call::ToggleReaction {
                incident_id: "7".into(),
                reaction: ReactionType::Concerned
            },
            Call::UpdateProfile(ProfilePatch {
                bio: Some("hello".into()),
                ..ProfilePatch::default()
            }),
        ]
    );
}

#[test]
fn test_dispatch_skips_unrecognized() {
    let api = FakeApi::new();
    let action = Action::Unrecognized {
        kind: "delete_incident".into(),
        payload: serde_json::json!({"incident_id": "1"}),
    };
    assert!(dispatch(&api, &action).is_none());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_fake_returns_scripted_failure() {
    let api = FakeApi::new();
    api.fail_on("boom", ApiError::Transient("down".into()));

    let err = api.create_comment("1", "boom").await.unwrap_err();
    assert!(matches!(err, ApiError::Transient(_)));
    api.create_comment("1", "fine").await.unwrap();

    api.clear_failures();
    api.create_comment("1", "boom").await.unwrap();
}

#[parameterized(
    unauthorized = { ApiError::Unauthorized, false },
    validation = { ApiError::Validation { status: 422, message: "bad".into() }, true },
    transient = { ApiError::Transient("timeout".into()), false },
    io = { ApiError::Io("missing".into()), false },
)]
fn test_permanence(error: ApiError, permanent: bool) {
    assert_eq!(error.is_permanent(), permanent);
}
