// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::SyncError;

/// All possible errors that can occur in the ireport CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("action not found: {0}\n  hint: run 'ireport pending' to list queued actions")]
    ActionNotFound(String),

    #[error("ambiguous action ID '{prefix}' matches: {}\n  hint: use more characters of the ID", matches.join(", "))]
    AmbiguousId {
        prefix: String,
        matches: Vec<String>,
    },

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("nothing to update\n  hint: pass at least one of --full-name, --email, --phone, --bio")]
    EmptyProfileUpdate,

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("cannot determine state directory\n  hint: pass -C <path> or set IREPORT_STATE_DIR")]
    NoStateDir,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] ireport_core::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for ireport operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
