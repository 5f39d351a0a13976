// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline action queue and synchronizer.
//!
//! User actions taken without connectivity are queued locally and replayed
//! against the reporting API once the device is back online.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ OfflineSync  │────►│  RemoteApi  │────►│ Reporting   │
//! │  (service)   │     │   (trait)   │     │    API      │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!    │        ▲
//!    ▼        │ connectivity changes
//! ┌────────┐ ┌──────────────────────┐
//! │ Queue  │ │ ConnectivityMonitor  │
//! │ (kv)   │ │ (probe / manual)     │
//! └────────┘ └──────────────────────┘
//! ```
//!
//! # Features
//!
//! - Queue persisted as one versioned document in a key-value store
//! - Oldest-first replay, failures stay queued for the next pass
//! - Sync on reconnect plus a periodic pass while online
//! - Credentials cleared when the server rejects them
//! - Injectable API and connectivity traits for testing

mod api;
mod connectivity;
mod http;
mod lock;
mod queue;
mod runner;
mod service;

pub use api::{dispatch, ApiError, ApiFuture, ApiResult, RemoteApi, Replayed};
pub use connectivity::{
    probe, ConnectivityMonitor, ConnectivityState, ConnectivitySubscription, ManualMonitor,
    ProbeMonitor, ProbeTarget,
};
pub use http::{parse_base_url, HttpApi};
pub use lock::QueueLock;
pub use queue::{OfflineQueue, Persisted, QueueError, QueueResult};
pub use runner::{run, RunStats};
pub use service::{OfflineSync, SyncError, SyncEvent, SyncOptions, SyncReport, SyncResult};

#[cfg(test)]
pub(crate) use api::tests::{Call, FakeApi};

#[cfg(test)]
pub(crate) mod test_helpers;
