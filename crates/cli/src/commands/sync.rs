// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync and watch commands.
//!
//! `sync` probes the API once and replays the queue if it is reachable.
//! `watch` keeps a connectivity monitor running and syncs on every
//! reconnect and periodically while online, until interrupted.

use ireport_core::{KeyValueStore, QueuedAction};
use tokio::sync::broadcast;

use super::pending::short_id;
use super::Context;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::schema::sync::SyncOutputJson;
use crate::schema::ActionJson;
use crate::sync::{ConnectivityState, OfflineSync, ProbeMonitor, RemoteApi, SyncEvent};

/// What a single `sync` invocation did.
#[derive(Debug)]
pub(crate) struct SyncSummary {
    pub online: bool,
    pub replayed: usize,
    pub failed: usize,
    pub evicted: Vec<(QueuedAction, String)>,
    pub auth_required: bool,
    pub pending: usize,
}

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let sync = ctx.service()?;
    let state = ctx.probe().await?;
    tracing::debug!("probe result: {:?}", state);
    let summary = run_impl(&sync, state).await?;
    match output {
        OutputFormat::Text => print!("{}", render_text(&summary)),
        OutputFormat::Json => println!("{}", render_json(&summary)?),
    }
    Ok(())
}

/// Record `state` and run one pass, collecting what happened.
pub(crate) async fn run_impl<S: KeyValueStore, A: RemoteApi>(
    sync: &OfflineSync<S, A>,
    state: ConnectivityState,
) -> Result<SyncSummary> {
    let mut events = sync.subscribe_events();
    sync.set_connectivity(state);
    let report = sync.sync_pass().await?;

    let mut evicted = Vec::new();
    loop {
        match events.try_recv() {
            Ok(SyncEvent::Evicted { action, reason }) => evicted.push((action, reason)),
            Ok(SyncEvent::PersistFailed { reason }) => {
                eprintln!("warning: failed to save queue: {}", reason);
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!("missed {} sync event(s)", n);
            }
            Err(_) => break,
        }
    }

    Ok(SyncSummary {
        online: !report.skipped_offline,
        replayed: report.replayed,
        failed: report.failed,
        evicted,
        auth_required: report.auth_required,
        pending: sync.list_pending().await?.len(),
    })
}

pub(crate) fn render_text(summary: &SyncSummary) -> String {
    if !summary.online {
        return format!(
            "Offline: nothing sent, {} action(s) still pending\n",
            summary.pending
        );
    }

    let mut out = format!("Synced {} action(s)", summary.replayed);
    if summary.failed > 0 {
        out.push_str(&format!(", {} failed", summary.failed));
    }
    out.push_str(&format!(", {} pending\n", summary.pending));
    for (action, reason) in &summary.evicted {
        out.push_str(&format!(
            "Dropped {}: {} ({})\n",
            short_id(&action.id),
            action.action.summary(),
            reason
        ));
    }
    if summary.auth_required {
        out.push_str("Session expired: run 'ireport login <token>' and sync again\n");
    }
    out
}

pub(crate) fn render_json(summary: &SyncSummary) -> Result<String> {
    let evicted = summary
        .evicted
        .iter()
        .map(|(action, _)| ActionJson::new(action))
        .collect::<Result<Vec<_>>>()?;
    let output = SyncOutputJson {
        online: summary.online,
        replayed: summary.replayed,
        failed: summary.failed,
        evicted,
        auth_required: summary.auth_required,
        pending: summary.pending,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Sync on every reconnect and periodically while online, until Ctrl-C.
pub async fn watch(ctx: &Context) -> Result<()> {
    let sync = ctx.service()?;
    let target = ctx.probe_target()?;
    let monitor = ProbeMonitor::spawn(
        target,
        ctx.config.probe_interval(),
        ctx.config.probe_timeout(),
    );

    eprintln!(
        "Watching {} ({} pending, Ctrl-C to stop)",
        ctx.config.api.base_url,
        *sync.pending_count().borrow()
    );
    tracing::info!("watch started against {}", ctx.config.api.base_url);

    let stats = crate::sync::run(
        &sync,
        &monitor,
        ctx.config.sync_interval(),
        shutdown_signal(),
    )
    .await;

    tracing::info!(
        "watch stopped after {} pass(es), {} replayed",
        stats.passes,
        stats.replayed
    );
    eprintln!(
        "Stopped: {} action(s) sent in {} sync pass(es)",
        stats.replayed, stats.passes
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
