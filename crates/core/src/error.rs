// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ireport-core operations.

use thiserror::Error;

/// All possible errors that can occur in ireport-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid action kind: '{0}'\n  hint: valid kinds are: create_incident, create_comment, toggle_reaction, update_profile")]
    InvalidActionKind(String),

    #[error("invalid reaction: '{0}'\n  hint: valid reactions are: like, helpful, concerned, resolved")]
    InvalidReaction(String),

    #[error("invalid category: '{0}'\n  hint: valid categories are: damages, lost_and_found, accidents, environmental_hazards, notices_suggestions, complaints")]
    InvalidCategory(String),

    #[error("unsupported queue format version {found} (this build reads up to {supported})")]
    UnsupportedQueueVersion { found: u32, supported: u32 },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for ireport-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
