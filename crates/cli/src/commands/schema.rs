// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Schema command implementation.
//!
//! Outputs JSON Schema documents for the persisted queue and for
//! commands that support JSON output.

use crate::cli::SchemaCommand;
use crate::error::Result;
use crate::schema::{pending, status, sync};
use ireport_core::StoredQueue;
use schemars::schema_for;

/// Run the schema command.
pub fn run(cmd: SchemaCommand) -> Result<()> {
    let schema = match cmd {
        SchemaCommand::Queue => schema_for!(StoredQueue),
        SchemaCommand::Pending => schema_for!(pending::PendingOutputJson),
        SchemaCommand::Status => schema_for!(status::StatusOutputJson),
        SchemaCommand::Sync => schema_for!(sync::SyncOutputJson),
    };

    let json = serde_json::to_string_pretty(&schema)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
