// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred mutations captured while the device is offline.
//!
//! Every mutating user operation that cannot reach the server is recorded as a
//! [`QueuedAction`]. The action body is a closed sum type ([`Action`]) so replay
//! dispatch is exhaustive. On the wire each record is a flat object:
//!
//! ```text
//! { "id": "...", "kind": "create_comment", "payload": { ... }, "enqueued_at": "..." }
//! ```
//!
//! Records whose kind (or payload) this build does not understand are kept as
//! [`Action::Unrecognized`] so they survive a rewrite of the queue untouched.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Highest persisted queue format version this build can read and the one it writes.
pub const QUEUE_FORMAT_VERSION: u32 = 1;

/// Unique identifier of a queued action, assigned at enqueue time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        ActionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        ActionId(s.to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        ActionId(s)
    }
}

/// The closed set of mutations that can be deferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateIncident,
    CreateComment,
    ToggleReaction,
    UpdateProfile,
}

impl ActionKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CreateIncident => "create_incident",
            ActionKind::CreateComment => "create_comment",
            ActionKind::ToggleReaction => "toggle_reaction",
            ActionKind::UpdateProfile => "update_profile",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create_incident" => Ok(ActionKind::CreateIncident),
            "create_comment" => Ok(ActionKind::CreateComment),
            "toggle_reaction" => Ok(ActionKind::ToggleReaction),
            "update_profile" => Ok(ActionKind::UpdateProfile),
            _ => Err(Error::InvalidActionKind(s.to_string())),
        }
    }
}

/// Incident category as understood by the reporting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Damages,
    LostAndFound,
    Accidents,
    EnvironmentalHazards,
    NoticesSuggestions,
    Complaints,
}

impl Category {
    /// Returns the string representation used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Damages => "damages",
            Category::LostAndFound => "lost_and_found",
            Category::Accidents => "accidents",
            Category::EnvironmentalHazards => "environmental_hazards",
            Category::NoticesSuggestions => "notices_suggestions",
            Category::Complaints => "complaints",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "damages" => Ok(Category::Damages),
            "lost_and_found" => Ok(Category::LostAndFound),
            "accidents" => Ok(Category::Accidents),
            "environmental_hazards" => Ok(Category::EnvironmentalHazards),
            "notices_suggestions" => Ok(Category::NoticesSuggestions),
            "complaints" => Ok(Category::Complaints),
            _ => Err(Error::InvalidCategory(s.to_string())),
        }
    }
}

/// Reaction a user can toggle on an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Helpful,
    Concerned,
    Resolved,
}

impl ReactionType {
    /// Returns the string representation used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Like => "like",
            ReactionType::Helpful => "helpful",
            ReactionType::Concerned => "concerned",
            ReactionType::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "like" => Ok(ReactionType::Like),
            "helpful" => Ok(ReactionType::Helpful),
            "concerned" => Ok(ReactionType::Concerned),
            "resolved" => Ok(ReactionType::Resolved),
            _ => Err(Error::InvalidReaction(s.to_string())),
        }
    }
}

/// Reference to a local image file attached to a new incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ImageRef {
    /// Path of the image on the local filesystem.
    pub path: String,
    /// MIME type sent with the upload (e.g. `image/jpeg`).
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Payload of a [`Action::CreateIncident`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct NewIncident {
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// Payload of a [`Action::CreateComment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct NewComment {
    pub incident_id: String,
    pub content: String,
}

/// Payload of a [`Action::ToggleReaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ReactionToggle {
    pub incident_id: String,
    pub reaction_type: ReactionType,
}

/// Partial user record sent with [`Action::UpdateProfile`].
///
/// Fields the client does not model are kept in `extra` and sent back as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProfilePatch {
    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.bio.is_none()
            && self.extra.is_empty()
    }
}

/// The mutation carried by a queued action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateIncident(NewIncident),
    CreateComment(NewComment),
    ToggleReaction(ReactionToggle),
    UpdateProfile(ProfilePatch),
    /// A record this build cannot replay, preserved verbatim.
    Unrecognized {
        kind: String,
        payload: serde_json::Value,
    },
}

impl Action {
    /// Returns the kind, or `None` for unrecognized records.
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Action::CreateIncident(_) => Some(ActionKind::CreateIncident),
            Action::CreateComment(_) => Some(ActionKind::CreateComment),
            Action::ToggleReaction(_) => Some(ActionKind::ToggleReaction),
            Action::UpdateProfile(_) => Some(ActionKind::UpdateProfile),
            Action::Unrecognized { .. } => None,
        }
    }

    /// Returns the kind as stored on the wire.
    pub fn kind_str(&self) -> &str {
        match self {
            Action::Unrecognized { kind, .. } => kind.as_str(),
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    /// Returns the incident this action targets, if it targets an existing one.
    pub fn incident_id(&self) -> Option<&str> {
        match self {
            Action::CreateComment(c) => Some(&c.incident_id),
            Action::ToggleReaction(r) => Some(&r.incident_id),
            _ => None,
        }
    }

    /// Rebuilds an action from its stored kind and payload.
    ///
    /// Unknown kinds and payloads that do not match their kind become
    /// [`Action::Unrecognized`] instead of failing the whole queue.
    pub fn from_parts(kind: String, payload: serde_json::Value) -> Self {
        let Ok(known) = kind.parse::<ActionKind>() else {
            return Action::Unrecognized { kind, payload };
        };
        let parsed = match known {
            ActionKind::CreateIncident => {
                serde_json::from_value(payload.clone()).map(Action::CreateIncident)
            }
            ActionKind::CreateComment => {
                serde_json::from_value(payload.clone()).map(Action::CreateComment)
            }
            ActionKind::ToggleReaction => {
                serde_json::from_value(payload.clone()).map(Action::ToggleReaction)
            }
            ActionKind::UpdateProfile => {
                serde_json::from_value(payload.clone()).map(Action::UpdateProfile)
            }
        };
        match parsed {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!("payload does not match kind {}: {}", kind, e);
                Action::Unrecognized { kind, payload }
            }
        }
    }

    /// Short human-readable description for listings.
    pub fn summary(&self) -> String {
        match self {
            Action::CreateIncident(i) => format!("new incident \"{}\" ({})", i.title, i.category),
            Action::CreateComment(c) => format!("comment on {}: {}", c.incident_id, c.content),
            Action::ToggleReaction(r) => format!("{} on {}", r.reaction_type, r.incident_id),
            Action::UpdateProfile(_) => "profile update".to_string(),
            Action::Unrecognized { kind, .. } => format!("unrecognized action '{}'", kind),
        }
    }
}

/// A durable record of a deferred mutation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct QueuedAction {
    pub id: ActionId,
    pub action: Action,
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedAction {
    /// Creates a record with a fresh id, stamped with the current time.
    pub fn new(action: Action) -> Self {
        QueuedAction {
            id: ActionId::generate(),
            action,
            enqueued_at: Utc::now(),
        }
    }

    /// Converts to the wire record with an untyped payload.
    pub fn to_record(&self) -> Result<StoredRecord> {
        let payload = match &self.action {
            Action::CreateIncident(p) => serde_json::to_value(p)?,
            Action::CreateComment(p) => serde_json::to_value(p)?,
            Action::ToggleReaction(p) => serde_json::to_value(p)?,
            Action::UpdateProfile(p) => serde_json::to_value(p)?,
            Action::Unrecognized { payload, .. } => payload.clone(),
        };
        Ok(StoredRecord {
            id: self.id.clone(),
            kind: self.action.kind_str().to_string(),
            payload,
            enqueued_at: self.enqueued_at,
        })
    }
}

impl Serialize for QueuedAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("QueuedAction", 4)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("kind", self.action.kind_str())?;
        match &self.action {
            Action::CreateIncident(p) => s.serialize_field("payload", p)?,
            Action::CreateComment(p) => s.serialize_field("payload", p)?,
            Action::ToggleReaction(p) => s.serialize_field("payload", p)?,
            Action::UpdateProfile(p) => s.serialize_field("payload", p)?,
            Action::Unrecognized { payload, .. } => s.serialize_field("payload", payload)?,
        }
        s.serialize_field("enqueued_at", &self.enqueued_at)?;
        s.end()
    }
}

/// Wire shape of a single queued action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct StoredRecord {
    pub id: ActionId,
    /// One of the [`ActionKind`] wire names (or a kind from a newer version).
    pub kind: String,
    /// Kind-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
}

impl From<StoredRecord> for QueuedAction {
    fn from(record: StoredRecord) -> Self {
        QueuedAction {
            id: record.id,
            action: Action::from_parts(record.kind, record.payload),
            enqueued_at: record.enqueued_at,
        }
    }
}

/// Wire shape of the whole persisted queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct StoredQueue {
    /// Format version, see [`QUEUE_FORMAT_VERSION`].
    pub version: u32,
    /// Pending actions, oldest first.
    pub actions: Vec<StoredRecord>,
}

#[derive(Serialize)]
struct StoredQueueRef<'a> {
    version: u32,
    actions: &'a [QueuedAction],
}

/// Serializes the queue into the versioned document written to the store.
pub fn encode_queue(actions: &[QueuedAction]) -> Result<String> {
    let doc = StoredQueueRef {
        version: QUEUE_FORMAT_VERSION,
        actions,
    };
    Ok(serde_json::to_string(&doc)?)
}

/// Parses a persisted queue document.
///
/// Accepts the versioned envelope as well as a bare array of records (the
/// unversioned layout). Documents written by a newer format version are
/// rejected so they are never overwritten with a lossy rewrite.
pub fn decode_queue(raw: &str) -> Result<Vec<QueuedAction>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value = serde_json::from_str(raw)?;
    match value {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0);
            if version > u64::from(QUEUE_FORMAT_VERSION) {
                return Err(Error::UnsupportedQueueVersion {
                    found: u32::try_from(version).unwrap_or(u32::MAX),
                    supported: QUEUE_FORMAT_VERSION,
                });
            }
            let actions = map
                .remove("actions")
                .unwrap_or(serde_json::Value::Array(Vec::new()));
            Ok(serde_json::from_value(actions)?)
        }
        serde_json::Value::Null => Ok(Vec::new()),
        other => Err(Error::Json(serde::de::Error::custom(format!(
            "expected queue document, found {}",
            other
        )))),
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
