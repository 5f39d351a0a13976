// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use std::path::PathBuf;

use clap::Args;

use super::non_empty_string;

/// Fields of a new incident report.
#[derive(Args, Clone, Debug)]
pub struct IncidentArgs {
    /// Short title
    #[arg(long, short, value_parser = non_empty_string)]
    pub title: String,

    /// What happened
    #[arg(long, short, value_parser = non_empty_string)]
    pub description: String,

    /// Category (damages, lost_and_found, accidents, environmental_hazards,
    /// notices_suggestions, complaints)
    #[arg(long, short)]
    pub category: String,

    /// Where it happened
    #[arg(long, short)]
    pub location: Option<String>,

    /// Photo to attach; read when the incident is sent
    #[arg(long, value_name = "path")]
    pub image: Option<PathBuf>,

    /// MIME type of the photo (guessed from the extension when omitted)
    #[arg(long, requires = "image", value_name = "type")]
    pub image_type: Option<String>,
}
