// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fs;
use std::path::Path;

use clap::Parser;
use irsync::env::vars;
use irsync::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(&cli);
    if let Err(e) = irsync::run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `watch` logs to `sync.log` in the state directory; everything else
/// only reports warnings on stderr.
fn setup_logging(cli: &Cli) {
    if matches!(cli.command, Command::Watch) {
        if let Ok(state_dir) = irsync::resolve_state_dir(cli.state_dir.as_deref()) {
            let filter =
                EnvFilter::try_from_env(vars::RUST_LOG).unwrap_or_else(|_| EnvFilter::new("info"));
            if let Some(file) = open_log(&irsync::get_log_path(&state_dir)) {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(file)
                    .with_ansi(false)
                    .init();
                return;
            }
        }
    }

    let filter = EnvFilter::try_from_env(vars::RUST_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_log(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
