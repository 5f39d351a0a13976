// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote API abstraction for replaying queued actions.
//!
//! Provides a trait-based API layer that enables:
//! - Real HTTP calls for production ([`HttpApi`](super::http::HttpApi))
//! - Scripted fakes for unit testing

use std::future::Future;
use std::pin::Pin;

use ireport_core::{Action, NewIncident, ProfilePatch, ReactionType};

/// Error type for remote API calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the credentials (HTTP 401).
    #[error("authentication required")]
    Unauthorized,

    /// The server refused the request as invalid; retrying cannot succeed.
    #[error("rejected by server ({status}): {message}")]
    Validation { status: u16, message: String },

    /// Network failure, timeout or server-side error; worth retrying later.
    #[error("transient failure: {0}")]
    Transient(String),

    /// A local file referenced by the action could not be read; the file
    /// may come back, so the action is retried like a transient failure.
    #[error("local file error: {0}")]
    Io(String),
}

impl ApiError {
    /// Returns true if replaying the same request again cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    /// Classifies an HTTP error status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            408 | 425 | 429 => ApiError::Transient(format!("{}: {}", status, message)),
            400..=499 => ApiError::Validation { status, message },
            _ => ApiError::Transient(format!("{}: {}", status, message)),
        }
    }
}

/// Result type for remote API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Successful replay of one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replayed {
    /// Identifier of the resource the server created, when it returned one.
    pub resource_id: Option<String>,
}

pub type ApiFuture<'a> = Pin<Box<dyn Future<Output = ApiResult<Replayed>> + Send + 'a>>;

/// The four remote operations an offline action can replay into.
pub trait RemoteApi: Send + Sync {
    /// Create an incident, uploading the attached image if any.
    fn create_incident<'a>(&'a self, incident: &'a NewIncident) -> ApiFuture<'a>;

    /// Post a comment on an incident.
    fn create_comment<'a>(&'a self, incident_id: &'a str, content: &'a str) -> ApiFuture<'a>;

    /// Toggle the caller's reaction on an incident.
    fn toggle_reaction<'a>(&'a self, incident_id: &'a str, reaction: ReactionType)
        -> ApiFuture<'a>;

    /// Apply a partial update to the caller's profile.
    fn update_profile<'a>(&'a self, patch: &'a ProfilePatch) -> ApiFuture<'a>;

    /// Replace the bearer token sent with subsequent calls; `None` sends none.
    fn set_token(&self, _token: Option<String>) {}
}

/// Route an action to the matching remote call.
///
/// Returns `None` for [`Action::Unrecognized`], which has no remote call.
pub fn dispatch<'a, A: RemoteApi + ?Sized>(api: &'a A, action: &'a Action) -> Option<ApiFuture<'a>> {
    match action {
        Action::CreateIncident(incident) => Some(api.create_incident(incident)),
        Action::CreateComment(c) => Some(api.create_comment(&c.incident_id, &c.content)),
        Action::ToggleReaction(r) => Some(api.toggle_reaction(&r.incident_id, r.reaction_type)),
        Action::UpdateProfile(patch) => Some(api.update_profile(patch)),
        Action::Unrecognized { .. } => None,
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
pub(crate) mod tests;
