// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline synchronizer.
//!
//! [`OfflineSync`] owns the queue, the remote API client and the last known
//! connectivity state. User actions are enqueued while offline and replayed
//! oldest first once the device is back online.

use std::path::PathBuf;

use ireport_core::{keys, Action, ActionId, KeyValueStore, QueuedAction};
use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex, MutexGuard};

use super::api::{dispatch, ApiError, RemoteApi, Replayed};
use super::connectivity::ConnectivityState;
use super::lock::QueueLock;
use super::queue::{OfflineQueue, Persisted, QueueError};

/// Capacity of the event channel; slow subscribers miss the oldest events.
const EVENT_CAPACITY: usize = 64;

/// Error type for synchronizer operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("failed to lock offline queue: {0}")]
    Lock(#[source] std::io::Error),

    #[error(
        "incident {incident_id} has not been synced yet\n  hint: sync pending action {action_id} first, then retry"
    )]
    DependsOnPendingIncident {
        incident_id: String,
        action_id: ActionId,
    },
}

/// Result type for synchronizer operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Tunables for the synchronizer.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Drop actions the server rejects outright instead of retrying them forever.
    pub evict_permanent_failures: bool,
    /// Lock file shared with other processes using the same store.
    ///
    /// When set, every queue mutation takes the lock and reloads the queue first.
    pub lock_file: Option<PathBuf>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            evict_permanent_failures: true,
            lock_file: None,
        }
    }
}

/// Notifications for the surrounding application.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// An incident changed on the server; views showing it should refresh.
    /// `None` means a new incident whose id the server did not report.
    IncidentChanged { incident_id: Option<String> },
    /// The profile was updated on the server.
    ProfileChanged,
    /// An action was dropped because the server will never accept it.
    Evicted { action: QueuedAction, reason: String },
    /// Credentials were rejected and have been cleared.
    AuthenticationRequired,
    /// A queue change could not be written to the store.
    PersistFailed { reason: String },
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub replayed: usize,
    pub failed: usize,
    pub evicted: usize,
    pub skipped_offline: bool,
    pub auth_required: bool,
}

/// Offline action queue plus the logic to replay it.
pub struct OfflineSync<S: KeyValueStore, A: RemoteApi> {
    queue: Mutex<OfflineQueue<S>>,
    api: A,
    options: SyncOptions,
    connectivity: watch::Sender<Option<ConnectivityState>>,
    pending: watch::Sender<usize>,
    events: broadcast::Sender<SyncEvent>,
}

impl<S: KeyValueStore, A: RemoteApi> OfflineSync<S, A> {
    /// Open the synchronizer, rehydrating any actions persisted by a previous run.
    ///
    /// Fails only if the store cannot be read or holds an unreadable queue.
    pub fn open(store: S, api: A, options: SyncOptions) -> SyncResult<Self> {
        let queue = OfflineQueue::open(store)?;
        let (pending, _) = watch::channel(queue.len());
        let (connectivity, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        if !queue.is_empty() {
            tracing::info!("restored {} pending offline action(s)", queue.len());
        }

        Ok(OfflineSync {
            queue: Mutex::new(queue),
            api,
            options,
            connectivity,
            pending,
            events,
        })
    }

    /// Queue an action for later replay. Never touches the network.
    pub async fn enqueue(&self, action: Action) -> SyncResult<QueuedAction> {
        let (mut queue, _lock) = self.lock_queue().await?;

        if let Some(incident_id) = action.incident_id() {
            let pending_create = queue.pending().iter().find(|queued| {
                matches!(queued.action, Action::CreateIncident(_))
                    && queued.id.as_str() == incident_id
            });
            if let Some(queued) = pending_create {
                return Err(SyncError::DependsOnPendingIncident {
                    incident_id: incident_id.to_string(),
                    action_id: queued.id.clone(),
                });
            }
        }

        let (queued, persisted) = queue.enqueue(action);
        self.note_persisted(persisted);
        self.publish_pending(queue.len());
        tracing::debug!("queued {} ({})", queued.id, queued.action.kind_str());
        Ok(queued)
    }

    /// Pending actions, oldest first.
    pub async fn list_pending(&self) -> SyncResult<Vec<QueuedAction>> {
        let mut queue = self.queue.lock().await;
        if self.options.lock_file.is_some() {
            queue.reload()?;
            self.publish_pending(queue.len());
        }
        Ok(queue.pending().to_vec())
    }

    /// Remove a pending action. Unknown ids are ignored.
    pub async fn remove(&self, id: &ActionId) -> SyncResult<Option<QueuedAction>> {
        let (mut queue, _lock) = self.lock_queue().await?;
        let Some((removed, persisted)) = queue.remove(id) else {
            return Ok(None);
        };
        self.note_persisted(persisted);
        self.publish_pending(queue.len());
        tracing::debug!("removed {} from offline queue", id);
        Ok(Some(removed))
    }

    /// Replay pending actions and return how many succeeded.
    pub async fn sync(&self) -> SyncResult<usize> {
        Ok(self.sync_pass().await?.replayed)
    }

    /// Replay pending actions oldest first.
    ///
    /// A failed action stays queued and the pass moves on to the next one;
    /// only an authentication failure ends the pass early. Does nothing
    /// while offline.
    pub async fn sync_pass(&self) -> SyncResult<SyncReport> {
        if !self.is_online() {
            tracing::debug!("offline, skipping sync");
            return Ok(SyncReport {
                skipped_offline: true,
                ..SyncReport::default()
            });
        }

        let (mut queue, _lock) = self.lock_queue().await?;
        let mut report = SyncReport::default();
        if queue.is_empty() {
            return Ok(report);
        }

        // Another process may have signed in or out since the last pass
        let token = match queue.store().get(keys::AUTH_TOKEN) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("failed to read {}, sending no token: {}", keys::AUTH_TOKEN, e);
                None
            }
        };
        self.api.set_token(token.clone());

        let snapshot = queue.pending().to_vec();
        tracing::info!("syncing {} offline action(s)", snapshot.len());

        for queued in snapshot {
            let Some(call) = dispatch(&self.api, &queued.action) else {
                tracing::error!(
                    "cannot replay {}: unrecognized action kind '{}', leaving it queued",
                    queued.id,
                    queued.action.kind_str()
                );
                report.failed += 1;
                continue;
            };

            match call.await {
                Ok(replayed) => {
                    tracing::debug!("replayed {}: {}", queued.id, queued.action.summary());
                    if let Some((_, persisted)) = queue.remove(&queued.id) {
                        self.note_persisted(persisted);
                    }
                    self.publish_pending(queue.len());
                    self.notify_replayed(&queued.action, replayed);
                    report.replayed += 1;
                }
                Err(ApiError::Unauthorized) => {
                    tracing::warn!("server rejected credentials while replaying {}", queued.id);
                    self.sign_out(queue.store(), token.as_deref());
                    report.failed += 1;
                    report.auth_required = true;
                    break;
                }
                Err(e) if e.is_permanent() && self.options.evict_permanent_failures => {
                    tracing::warn!("dropping {} ({}): {}", queued.id, queued.action.summary(), e);
                    if let Some((_, persisted)) = queue.remove(&queued.id) {
                        self.note_persisted(persisted);
                    }
                    self.publish_pending(queue.len());
                    self.emit(SyncEvent::Evicted {
                        action: queued,
                        reason: e.to_string(),
                    });
                    report.evicted += 1;
                }
                Err(e) => {
                    tracing::warn!("failed to replay {}, keeping it queued: {}", queued.id, e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "sync finished: {} replayed, {} failed, {} dropped, {} pending",
            report.replayed,
            report.failed,
            report.evicted,
            queue.len()
        );
        Ok(report)
    }

    /// Record a connectivity change, syncing when the device comes online.
    ///
    /// Returns the replay count when a sync ran. Repeated online reports do
    /// not trigger further passes.
    pub async fn on_connectivity_change(
        &self,
        state: ConnectivityState,
    ) -> SyncResult<Option<usize>> {
        let previous = self.set_connectivity(state);
        let was_online = previous.is_some_and(|s| s.is_online());
        if state.is_online() && !was_online {
            tracing::info!("back online, syncing offline actions");
            return self.sync().await.map(Some);
        }
        if !state.is_online() && was_online {
            tracing::info!("went offline, queueing actions locally");
        }
        Ok(None)
    }

    /// Record a connectivity state without triggering a sync.
    ///
    /// Returns the previously known state.
    pub fn set_connectivity(&self, state: ConnectivityState) -> Option<ConnectivityState> {
        self.connectivity.send_replace(Some(state))
    }

    /// Last known connectivity state, `None` until one is reported.
    pub fn connectivity(&self) -> Option<ConnectivityState> {
        *self.connectivity.borrow()
    }

    /// Returns true if the last known state is online.
    pub fn is_online(&self) -> bool {
        self.connectivity().is_some_and(|s| s.is_online())
    }

    /// Observe the number of pending actions.
    pub fn pending_count(&self) -> watch::Receiver<usize> {
        self.pending.subscribe()
    }

    /// Subscribe to sync notifications.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    async fn lock_queue(&self) -> SyncResult<(MutexGuard<'_, OfflineQueue<S>>, Option<QueueLock>)> {
        let mut queue = self.queue.lock().await;
        let Some(path) = &self.options.lock_file else {
            return Ok((queue, None));
        };

        let lock = QueueLock::acquire_async(path.clone())
            .await
            .map_err(SyncError::Lock)?;
        if let Err(e) = queue.reload() {
            if !queue.is_dirty() {
                return Err(e.into());
            }
            tracing::warn!("{}", e);
        }
        self.publish_pending(queue.len());
        Ok((queue, Some(lock)))
    }

    /// Clear the rejected credentials unless a newer token was stored meanwhile.
    fn sign_out(&self, store: &S, rejected: Option<&str>) {
        self.api.set_token(None);
        match store.get(keys::AUTH_TOKEN) {
            Ok(current) if current.as_deref() != rejected => {
                tracing::info!("credentials changed during sync, keeping the new token");
                self.emit(SyncEvent::AuthenticationRequired);
                return;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("failed to read {}: {}", keys::AUTH_TOKEN, e),
        }
        for key in [keys::AUTH_TOKEN, keys::USER_DATA] {
            if let Err(e) = store.remove(key) {
                tracing::warn!("failed to clear {}: {}", key, e);
            }
        }
        self.emit(SyncEvent::AuthenticationRequired);
    }

    fn notify_replayed(&self, action: &Action, replayed: Replayed) {
        let event = match action {
            Action::CreateIncident(_) => SyncEvent::IncidentChanged {
                incident_id: replayed.resource_id,
            },
            Action::CreateComment(_) | Action::ToggleReaction(_) => SyncEvent::IncidentChanged {
                incident_id: action.incident_id().map(str::to_string),
            },
            Action::UpdateProfile(_) => SyncEvent::ProfileChanged,
            Action::Unrecognized { .. } => return,
        };
        self.emit(event);
    }

    fn note_persisted(&self, persisted: Persisted) {
        if let Persisted::MemoryOnly(e) = persisted {
            tracing::warn!("{}; keeping queue in memory", e);
            self.emit(SyncEvent::PersistFailed {
                reason: e.to_string(),
            });
        }
    }

    fn publish_pending(&self, count: usize) {
        self.pending.send_if_modified(|current| {
            let changed = *current != count;
            *current = count;
            changed
        });
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
