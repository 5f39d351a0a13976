// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! A [`ConnectivityMonitor`] answers "are we online right now?" and hands out
//! [`ConnectivitySubscription`]s that yield every later change. Subscriptions
//! are plain values: dropping one unsubscribes, and `next()` returns `None`
//! once the monitor is gone. Rapid flapping between polls is coalesced into
//! the latest state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Point-in-time network reachability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivityState {
    /// A network link is up (name resolution works).
    pub is_connected: bool,
    /// The API host answered a connection attempt.
    pub is_internet_reachable: bool,
}

impl ConnectivityState {
    pub const OFFLINE: ConnectivityState = ConnectivityState {
        is_connected: false,
        is_internet_reachable: false,
    };

    pub const ONLINE: ConnectivityState = ConnectivityState {
        is_connected: true,
        is_internet_reachable: true,
    };

    /// Online means both connected and reachable.
    pub fn is_online(&self) -> bool {
        self.is_connected && self.is_internet_reachable
    }
}

/// Source of connectivity information.
pub trait ConnectivityMonitor: Send + Sync {
    /// Fetch the current state.
    fn fetch(&self) -> Pin<Box<dyn Future<Output = ConnectivityState> + Send + '_>>;

    /// Subscribe to subsequent state changes.
    fn subscribe(&self) -> ConnectivitySubscription;
}

/// Stream of connectivity changes.
pub struct ConnectivitySubscription {
    rx: watch::Receiver<Option<ConnectivityState>>,
}

impl ConnectivitySubscription {
    fn new(mut rx: watch::Receiver<Option<ConnectivityState>>) -> Self {
        rx.mark_unchanged();
        ConnectivitySubscription { rx }
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the monitor has shut down.
    pub async fn next(&mut self) -> Option<ConnectivityState> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(state) = *self.rx.borrow_and_update() {
                return Some(state);
            }
        }
    }

    /// The most recently observed state, if any.
    pub fn current(&self) -> Option<ConnectivityState> {
        *self.rx.borrow()
    }
}

/// Monitor driven by explicit `set` calls, for embedders that receive
/// connectivity events from elsewhere (and for tests).
pub struct ManualMonitor {
    tx: watch::Sender<Option<ConnectivityState>>,
}

impl ManualMonitor {
    /// Create a monitor with an initial state (`None` = unknown).
    pub fn new(initial: Option<ConnectivityState>) -> Self {
        let (tx, _) = watch::channel(initial);
        ManualMonitor { tx }
    }

    /// Publish a new state. Subscribers are woken only if it changed.
    pub fn set(&self, state: ConnectivityState) {
        self.tx.send_if_modified(|current| {
            if *current == Some(state) {
                false
            } else {
                *current = Some(state);
                true
            }
        });
    }
}

impl ConnectivityMonitor for ManualMonitor {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = ConnectivityState> + Send + '_>> {
        let state = self.tx.borrow().unwrap_or(ConnectivityState::OFFLINE);
        Box::pin(async move { state })
    }

    fn subscribe(&self) -> ConnectivitySubscription {
        ConnectivitySubscription::new(self.tx.subscribe())
    }
}

/// Host and port whose reachability stands in for "the internet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
}

impl ProbeTarget {
    /// Derive the probe target from the API base URL.
    pub fn from_url(url: &Url) -> Option<Self> {
        Some(ProbeTarget {
            host: url.host_str()?.to_string(),
            port: url.port_or_known_default()?,
        })
    }
}

/// Monitor that periodically probes the API host over TCP.
///
/// The background task stops when the monitor is dropped, which also ends
/// all subscriptions.
pub struct ProbeMonitor {
    target: ProbeTarget,
    timeout: Duration,
    tx: Arc<watch::Sender<Option<ConnectivityState>>>,
    task: JoinHandle<()>,
}

impl ProbeMonitor {
    /// Start probing `target` every `interval`. Must be called within a tokio runtime.
    pub fn spawn(target: ProbeTarget, interval: Duration, timeout: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        let tx = Arc::new(tx);

        let task = {
            let tx = Arc::clone(&tx);
            let target = target.clone();
            tokio::spawn(async move {
                loop {
                    let state = probe(&target, timeout).await;
                    publish(&tx, state);
                    tokio::time::sleep(interval).await;
                }
            })
        };

        ProbeMonitor {
            target,
            timeout,
            tx,
            task,
        }
    }
}

impl Drop for ProbeMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl ConnectivityMonitor for ProbeMonitor {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = ConnectivityState> + Send + '_>> {
        Box::pin(async move {
            let state = probe(&self.target, self.timeout).await;
            publish(&self.tx, state);
            state
        })
    }

    fn subscribe(&self) -> ConnectivitySubscription {
        ConnectivitySubscription::new(self.tx.subscribe())
    }
}

fn publish(tx: &watch::Sender<Option<ConnectivityState>>, state: ConnectivityState) {
    let changed = tx.send_if_modified(|current| {
        if *current == Some(state) {
            false
        } else {
            *current = Some(state);
            true
        }
    });
    if changed {
        tracing::debug!(
            "connectivity changed: connected={} reachable={}",
            state.is_connected,
            state.is_internet_reachable
        );
    }
}

/// Probe the target once.
///
/// Name resolution success means connected; a TCP handshake with any
/// resolved address within `timeout` means reachable.
pub async fn probe(target: &ProbeTarget, timeout: Duration) -> ConnectivityState {
    let resolved = tokio::time::timeout(
        timeout,
        tokio::net::lookup_host((target.host.as_str(), target.port)),
    )
    .await;

    let addrs: Vec<_> = match resolved {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(e)) => {
            tracing::debug!("cannot resolve {}: {}", target.host, e);
            return ConnectivityState::OFFLINE;
        }
        Err(_) => {
            tracing::debug!("resolving {} timed out", target.host);
            return ConnectivityState::OFFLINE;
        }
    };

    if addrs.is_empty() {
        return ConnectivityState::OFFLINE;
    }

    for addr in addrs {
        if let Ok(Ok(_stream)) = tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            return ConnectivityState::ONLINE;
        }
    }

    ConnectivityState {
        is_connected: true,
        is_internet_reachable: false,
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
