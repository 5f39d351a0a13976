// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! irsync - offline action queue and synchronizer for iReport.
//!
//! This crate provides the functionality behind the `ireport` CLI: user
//! actions (new incidents, comments, reactions, profile edits) are queued in
//! a local store while offline and replayed against the reporting API once
//! it is reachable again.
//!
//! # Main Components
//!
//! - [`sync::OfflineSync`] - the queue plus replay logic
//! - [`sync::HttpApi`] - HTTP client for the reporting API
//! - [`sync::ProbeMonitor`] - connectivity monitor driving [`sync::run`]
//! - [`Config`] - client configuration (`config.toml` in the state directory)
//! - [`Error`] - error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use irsync::sync::{HttpApi, OfflineSync, SyncOptions};
//! use ireport_core::SqliteStore;
//!
//! let store = SqliteStore::open(&path)?;
//! let api = HttpApi::new("https://reports.example.edu/api", timeout)?;
//! let sync = OfflineSync::open(store, api, SyncOptions::default())?;
//! sync.enqueue(action).await?;
//! sync.on_connectivity_change(state).await?;
//! ```

mod cli;
mod commands;
mod schema;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, IncidentArgs, OutputFormat, QueueCommand, SchemaCommand};
pub use config::{get_log_path, resolve_state_dir, Config};
pub use error::{Error, Result};

use commands::Context;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub async fn run(cli: Cli) -> Result<()> {
    let state_dir = cli.state_dir.as_deref();
    match cli.command {
        Command::Queue(cmd) => {
            let ctx = Context::open(state_dir)?;
            match cmd {
                QueueCommand::Incident(args) => commands::queue::incident(&ctx, args).await,
                QueueCommand::Comment {
                    incident_id,
                    content,
                } => commands::queue::comment(&ctx, &incident_id, &content).await,
                QueueCommand::React {
                    incident_id,
                    reaction,
                } => commands::queue::react(&ctx, &incident_id, &reaction).await,
                QueueCommand::Profile {
                    full_name,
                    email,
                    phone,
                    bio,
                } => commands::queue::profile(&ctx, full_name, email, phone, bio).await,
            }
        }
        Command::Pending { output } => {
            commands::pending::run(&Context::open(state_dir)?, output).await
        }
        Command::Drop { id } => commands::pending::drop(&Context::open(state_dir)?, &id).await,
        Command::Sync { output } => commands::sync::run(&Context::open(state_dir)?, output).await,
        Command::Watch => commands::sync::watch(&Context::open(state_dir)?).await,
        Command::Login { token } => commands::auth::login(&Context::open(state_dir)?, &token),
        Command::Logout => commands::auth::logout(&Context::open(state_dir)?),
        Command::Status { output } => {
            commands::status::run(&Context::open(state_dir)?, output).await
        }
        Command::Schema(cmd) => commands::schema::run(cmd),
    }
}
