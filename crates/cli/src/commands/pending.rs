// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending and drop commands: inspect and prune the offline queue.

use ireport_core::{ActionId, KeyValueStore, QueuedAction};

use super::Context;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::schema::pending::PendingOutputJson;
use crate::schema::ActionJson;
use crate::sync::{OfflineSync, RemoteApi};

/// Length of the ID prefix shown in text listings.
pub const SHORT_ID_LEN: usize = 8;

/// Shortest prefix accepted in place of a full ID.
const MIN_PREFIX_LEN: usize = 3;

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let sync = ctx.service()?;
    run_impl(&sync, output).await
}

pub(crate) async fn run_impl<S: KeyValueStore, A: RemoteApi>(
    sync: &OfflineSync<S, A>,
    output: OutputFormat,
) -> Result<()> {
    let pending = sync.list_pending().await?;
    match output {
        OutputFormat::Text => print!("{}", render_text(&pending)),
        OutputFormat::Json => println!("{}", render_json(&pending)?),
    }
    Ok(())
}

pub async fn drop(ctx: &Context, id: &str) -> Result<()> {
    let sync = ctx.service()?;
    drop_impl(&sync, id).await.map(|_| ())
}

pub(crate) async fn drop_impl<S: KeyValueStore, A: RemoteApi>(
    sync: &OfflineSync<S, A>,
    id: &str,
) -> Result<QueuedAction> {
    let pending = sync.list_pending().await?;
    let id = resolve_id(&pending, id)?;
    let removed = sync
        .remove(&id)
        .await?
        .ok_or_else(|| Error::ActionNotFound(id.to_string()))?;
    println!("Dropped {}: {}", short_id(&removed.id), removed.action.summary());
    Ok(removed)
}

/// Match `input` against queued IDs, accepting a unique prefix.
pub(crate) fn resolve_id(pending: &[QueuedAction], input: &str) -> Result<ActionId> {
    let input = input.trim();
    if let Some(exact) = pending.iter().find(|q| q.id.as_str() == input) {
        return Ok(exact.id.clone());
    }
    if input.len() < MIN_PREFIX_LEN {
        return Err(Error::ActionNotFound(input.to_string()));
    }

    let matches: Vec<&QueuedAction> = pending
        .iter()
        .filter(|q| q.id.as_str().starts_with(input))
        .collect();
    match matches.as_slice() {
        [] => Err(Error::ActionNotFound(input.to_string())),
        [only] => Ok(only.id.clone()),
        many => Err(Error::AmbiguousId {
            prefix: input.to_string(),
            matches: many.iter().map(|q| q.id.to_string()).collect(),
        }),
    }
}

pub(crate) fn short_id(id: &ActionId) -> &str {
    let s = id.as_str();
    s.get(..SHORT_ID_LEN).unwrap_or(s)
}

pub(crate) fn render_text(pending: &[QueuedAction]) -> String {
    if pending.is_empty() {
        return "No pending actions\n".to_string();
    }
    let mut out = format!("{} pending action(s), oldest first:\n", pending.len());
    for queued in pending {
        out.push_str(&format!(
            "  {}  {}  {:<15}  {}\n",
            short_id(&queued.id),
            queued.enqueued_at.format("%Y-%m-%d %H:%M"),
            queued.action.kind_str(),
            queued.action.summary()
        ));
    }
    out
}

pub(crate) fn render_json(pending: &[QueuedAction]) -> Result<String> {
    let actions = pending
        .iter()
        .map(ActionJson::new)
        .collect::<Result<Vec<_>>>()?;
    let output = PendingOutputJson {
        count: actions.len(),
        actions,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
