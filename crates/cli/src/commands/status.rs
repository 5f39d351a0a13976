// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Status command: connectivity, credentials and queue size at a glance.

use super::Context;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::schema::status::{ConnectivityJson, StatusOutputJson};

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let sync = ctx.service()?;
    let pending = sync.list_pending().await?.len();
    let connectivity = ctx.probe().await?;

    let status = StatusOutputJson {
        state_dir: ctx.state_dir.display().to_string(),
        api_url: ctx.config.api.base_url.clone(),
        connectivity: connectivity.into(),
        authenticated: ctx.token()?.is_some(),
        pending,
    };
    match output {
        OutputFormat::Text => print!("{}", render_text(&status)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
    }
    Ok(())
}

pub(crate) fn render_text(status: &StatusOutputJson) -> String {
    format!(
        "State dir: {}\nAPI: {}\nNetwork: {}\nSigned in: {}\nPending: {} action(s)\n",
        status.state_dir,
        status.api_url,
        describe(&status.connectivity),
        if status.authenticated { "yes" } else { "no" },
        status.pending
    )
}

fn describe(connectivity: &ConnectivityJson) -> &'static str {
    match (connectivity.is_connected, connectivity.is_internet_reachable) {
        (true, true) => "online",
        (true, false) => "offline (API unreachable)",
        (false, _) => "offline (no network)",
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
