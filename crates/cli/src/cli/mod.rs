// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::IncidentArgs;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ireport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Queue campus incident reports offline and sync them when back online")]
#[command(
    long_about = "Queue campus incident reports offline and sync them when back online.\n\n\
    Actions are stored locally and replayed against the iReport API, oldest first, \
    as soon as the API is reachable."
)]
pub struct Cli {
    /// Use <path> as the state directory (config, store, logs)
    #[arg(short = 'C', long = "state-dir", global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Queue an action for the next sync
    #[command(subcommand)]
    Queue(QueueCommand),

    /// List queued actions, oldest first
    #[command(after_help = "\
Examples:
  ireport pending              List queued actions
  ireport pending -o json      Machine-readable listing")]
    Pending {
        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Remove a queued action without sending it
    Drop {
        /// Action ID (as shown by 'ireport pending')
        id: String,
    },

    /// Replay queued actions now if the API is reachable
    Sync {
        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Keep syncing: on reconnect and periodically while online
    Watch,

    /// Store the API token used to authenticate replays
    Login {
        /// Bearer token issued by the iReport API
        #[arg(value_parser = non_empty_string)]
        token: String,
    },

    /// Forget the stored API token and user data
    Logout,

    /// Show connectivity, authentication and queue status
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Output JSON Schema for stored and printed documents
    #[command(subcommand)]
    Schema(SchemaCommand),
}

/// Actions that can be queued.
#[derive(Subcommand)]
pub enum QueueCommand {
    /// Report a new incident
    #[command(after_help = "\
Examples:
  ireport queue incident -t \"Broken window\" -d \"Room 204\" -c damages
  ireport queue incident -t \"Wet floor\" -d \"Lobby\" -c environmental-hazards --image ./floor.jpg")]
    Incident(IncidentArgs),

    /// Comment on an incident
    Comment {
        /// Server ID of the incident
        #[arg(value_parser = non_empty_string)]
        incident_id: String,
        /// Comment text
        #[arg(value_parser = non_empty_string)]
        content: String,
    },

    /// Toggle a reaction on an incident (like, helpful, concerned, resolved)
    React {
        /// Server ID of the incident
        #[arg(value_parser = non_empty_string)]
        incident_id: String,
        /// Reaction type
        reaction: String,
    },

    /// Update profile fields
    Profile {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

/// Documents with a JSON Schema.
#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaCommand {
    /// The persisted offline queue document
    Queue,
    /// Output of 'ireport pending -o json'
    Pending,
    /// Output of 'ireport status -o json'
    Status,
    /// Output of 'ireport sync -o json'
    Sync,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
