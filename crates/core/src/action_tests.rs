// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use yare::parameterized;

fn comment(incident_id: &str, content: &str) -> Action {
    Action::CreateComment(NewComment {
        incident_id: incident_id.to_string(),
        content: content.to_string(),
    })
}

#[parameterized(
    create_incident = { "create_incident", ActionKind::CreateIncident },
    create_comment = { "create_comment", ActionKind::CreateComment },
    toggle_reaction = { "toggle_reaction", ActionKind::ToggleReaction },
    update_profile = { "update_profile", ActionKind::UpdateProfile },
)]
fn test_action_kind_parses_wire_names(raw: &str, expected: ActionKind) {
    let kind: ActionKind = raw.parse().unwrap();
    assert_eq!(kind, expected);
    assert_eq!(kind.as_str(), raw);
}

#[test]
fn test_action_kind_rejects_unknown() {
    let err = "delete_incident".parse::<ActionKind>().unwrap_err();
    assert!(matches!(err, Error::InvalidActionKind(_)));
}

#[parameterized(
    lowercase = { "helpful", ReactionType::Helpful },
    uppercase = { "LIKE", ReactionType::Like },
    mixed = { "Concerned", ReactionType::Concerned },
)]
fn test_reaction_parses_case_insensitive(raw: &str, expected: ReactionType) {
    assert_eq!(raw.parse::<ReactionType>().unwrap(), expected);
}

#[parameterized(
    snake = { "lost_and_found", Category::LostAndFound },
    kebab = { "environmental-hazards", Category::EnvironmentalHazards },
    upper = { "COMPLAINTS", Category::Complaints },
)]
fn test_category_parses_loosely(raw: &str, expected: Category) {
    assert_eq!(raw.parse::<Category>().unwrap(), expected);
}

#[test]
fn test_category_rejects_unknown() {
    assert!(matches!(
        "noise".parse::<Category>(),
        Err(Error::InvalidCategory(_))
    ));
}

#[test]
fn test_generated_ids_are_unique() {
    let a = ActionId::generate();
    let b = ActionId::generate();
    assert_ne!(a, b);
}

#[test]
fn test_queued_action_wire_shape() {
    let queued = QueuedAction::new(comment("42", "test"));
    let value = serde_json::to_value(&queued).unwrap();

    assert_eq!(value["id"], queued.id.as_str());
    assert_eq!(value["kind"], "create_comment");
    assert_eq!(value["payload"]["incident_id"], "42");
    assert_eq!(value["payload"]["content"], "test");
    assert!(value["enqueued_at"].is_string());
}

#[test]
fn test_incident_payload_omits_absent_optionals() {
    let queued = QueuedAction::new(Action::CreateIncident(NewIncident {
        title: "Broken window".into(),
        description: "Library, second floor".into(),
        category: Category::Damages,
        location: None,
        image: None,
    }));
    let value = serde_json::to_value(&queued).unwrap();
    let payload = value["payload"].as_object().unwrap();

    assert_eq!(payload["category"], "damages");
    assert!(!payload.contains_key("location"));
    assert!(!payload.contains_key("image"));
}

#[test]
fn test_unknown_kind_is_kept_verbatim() {
    let raw = r#"{"id":"a1","kind":"pin_incident","payload":{"incident_id":"7","pinned":true},"enqueued_at":"2026-01-02T03:04:05Z"}"#;
    let queued: QueuedAction = serde_json::from_str(raw).unwrap();

    assert_eq!(queued.action.kind(), None);
    assert_eq!(queued.action.kind_str(), "pin_incident");

    let back = serde_json::to_value(&queued).unwrap();
    let original: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_mismatched_payload_becomes_unrecognized() {
    let action = Action::from_parts(
        "create_comment".into(),
        serde_json::json!({ "incident": 42 }),
    );
    assert!(matches!(action, Action::Unrecognized { ref kind, .. } if kind == "create_comment"));
}

#[test]
fn test_profile_patch_keeps_extra_fields() {
    let action = Action::from_parts(
        "update_profile".into(),
        serde_json::json!({ "bio": "hi", "department": "physics" }),
    );
    let Action::UpdateProfile(patch) = action else {
        panic!("expected profile update");
    };
    assert_eq!(patch.bio.as_deref(), Some("hi"));
    assert_eq!(patch.extra["department"], "physics");
    assert!(!patch.is_empty());
    assert!(ProfilePatch::default().is_empty());
}

#[test]
fn test_incident_id_only_for_targeted_actions() {
    assert_eq!(comment("42", "x").incident_id(), Some("42"));
    assert_eq!(
        Action::UpdateProfile(ProfilePatch::default()).incident_id(),
        None
    );
}

#[test]
fn test_encode_then_decode_preserves_order() {
    let actions = vec![
        QueuedAction::new(comment("1", "first")),
        QueuedAction::new(comment("2", "second")),
        QueuedAction::new(Action::ToggleReaction(ReactionToggle {
            incident_id: "3".into(),
            reaction_type: ReactionType::Like,
        })),
    ];
    let encoded = encode_queue(&actions).unwrap();
    assert!(encoded.contains("\"version\":1"));

    let decoded = decode_queue(&encoded).unwrap();
    assert_eq!(decoded, actions);
}

#[test]
fn test_decode_accepts_unversioned_array() {
    let raw = r#"[{"id":"a1","kind":"create_comment","payload":{"incident_id":"42","content":"hi"},"enqueued_at":"2026-01-02T03:04:05Z"}]"#;
    let decoded = decode_queue(raw).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].id.as_str(), "a1");
}

#[parameterized(
    empty = { "" },
    whitespace = { "  \n" },
    null = { "null" },
    no_actions = { r#"{"version":1}"# },
)]
fn test_decode_empty_documents(raw: &str) {
    assert!(decode_queue(raw).unwrap().is_empty());
}

#[test]
fn test_decode_rejects_newer_version() {
    let err = decode_queue(r#"{"version":2,"actions":[]}"#).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedQueueVersion {
            found: 2,
            supported: 1
        }
    ));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(decode_queue("not json"), Err(Error::Json(_))));
    assert!(matches!(decode_queue("42"), Err(Error::Json(_))));
}

#[test]
fn test_to_record_matches_serialized_form() {
    let queued = QueuedAction::new(comment("42", "test"));
    let record = queued.to_record().unwrap();
    assert_eq!(record.id, queued.id);
    assert_eq!(record.kind, "create_comment");
    assert_eq!(
        record.payload,
        serde_json::json!({"incident_id": "42", "content": "test"})
    );

    let via_serde: serde_json::Value = serde_json::to_value(&queued).unwrap();
    assert_eq!(via_serde["payload"], record.payload);
}
