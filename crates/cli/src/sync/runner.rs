// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running sync loop.

use std::future::Future;
use std::time::Duration;

use ireport_core::KeyValueStore;
use tokio::time::MissedTickBehavior;

use super::api::RemoteApi;
use super::connectivity::ConnectivityMonitor;
use super::service::{OfflineSync, SyncResult};

/// Totals across the life of one [`run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub passes: usize,
    pub replayed: usize,
}

/// Drive `service` until `shutdown` resolves.
///
/// Feeds every connectivity change from `monitor` into the service and
/// runs a pass every `interval` while online. Failed passes are logged and
/// the loop keeps going.
pub async fn run<S, A, M, F>(
    service: &OfflineSync<S, A>,
    monitor: &M,
    interval: Duration,
    shutdown: F,
) -> RunStats
where
    S: KeyValueStore,
    A: RemoteApi,
    M: ConnectivityMonitor + ?Sized,
    F: Future<Output = ()>,
{
    let mut stats = RunStats::default();
    let mut changes = monitor.subscribe();
    let mut monitor_open = true;

    let initial = monitor.fetch().await;
    record(&mut stats, service.on_connectivity_change(initial).await);

    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("sync loop stopping");
                break;
            }
            change = changes.next(), if monitor_open => match change {
                Some(state) => {
                    record(&mut stats, service.on_connectivity_change(state).await);
                }
                None => {
                    tracing::warn!("connectivity monitor stopped, continuing with periodic sync only");
                    monitor_open = false;
                }
            },
            _ = ticker.tick() => {
                if service.is_online() {
                    record(&mut stats, service.sync().await.map(Some));
                }
            }
        }
    }

    stats
}

fn record(stats: &mut RunStats, outcome: SyncResult<Option<usize>>) {
    match outcome {
        Ok(Some(replayed)) => {
            stats.passes += 1;
            stats.replayed += replayed;
        }
        Ok(None) => {}
        Err(e) => {
            stats.passes += 1;
            tracing::error!("sync pass failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
