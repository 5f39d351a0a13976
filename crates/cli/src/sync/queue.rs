// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue for persisting actions while disconnected.
//!
//! The queue is held in memory and written through to the key-value store as
//! one document after every mutation, so the whole queue is the unit of
//! atomicity. If a write fails the in-memory queue stays authoritative for the
//! rest of the session and the caller is told the change is memory-only.

use ireport_core::{decode_queue, encode_queue, keys, Action, ActionId, KeyValueStore, QueuedAction};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The persisted queue could not be read or parsed.
    #[error("failed to load offline queue: {0}")]
    Load(#[source] ireport_core::Error),

    /// The queue could not be written to the store.
    #[error("failed to persist offline queue: {0}")]
    Persist(#[source] ireport_core::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Outcome of writing a mutation through to the store.
#[must_use]
#[derive(Debug)]
pub enum Persisted {
    /// The mutation is on durable storage.
    Durable,
    /// The mutation only exists in memory and is lost on restart.
    MemoryOnly(QueueError),
}

impl Persisted {
    fn from_result(result: QueueResult<()>) -> Self {
        match result {
            Ok(()) => Persisted::Durable,
            Err(e) => Persisted::MemoryOnly(e),
        }
    }

    #[cfg(test)]
    pub fn is_durable(&self) -> bool {
        matches!(self, Persisted::Durable)
    }

    #[cfg(test)]
    pub fn into_result(self) -> QueueResult<()> {
        match self {
            Persisted::Durable => Ok(()),
            Persisted::MemoryOnly(e) => Err(e),
        }
    }
}

/// Offline queue for pending actions, oldest first.
pub struct OfflineQueue<S: KeyValueStore> {
    store: S,
    key: &'static str,
    actions: Vec<QueuedAction>,
    /// Memory holds changes the store has not seen.
    dirty: bool,
}

impl<S: KeyValueStore> OfflineQueue<S> {
    /// Open the queue stored under the default key, rehydrating any pending actions.
    pub fn open(store: S) -> QueueResult<Self> {
        let key = keys::OFFLINE_ACTIONS;
        let actions = load(&store, key)?;
        Ok(OfflineQueue {
            store,
            key,
            actions,
            dirty: false,
        })
    }

    /// Re-read the queue from the store, picking up changes made by other processes.
    ///
    /// While memory holds unpersisted changes it stays authoritative: the
    /// store is caught up instead of being read.
    pub fn reload(&mut self) -> QueueResult<()> {
        if self.dirty {
            return self.persist();
        }
        self.actions = load(&self.store, self.key)?;
        Ok(())
    }

    /// Append an action and persist the queue.
    pub fn enqueue(&mut self, action: Action) -> (QueuedAction, Persisted) {
        let queued = QueuedAction::new(action);
        self.actions.push(queued.clone());
        (queued, Persisted::from_result(self.persist()))
    }

    /// Pending actions, oldest first.
    pub fn pending(&self) -> &[QueuedAction] {
        &self.actions
    }

    /// Look up a pending action by id.
    pub fn get(&self, id: &ActionId) -> Option<&QueuedAction> {
        self.actions.iter().find(|a| &a.id == id)
    }

    /// Get the number of queued actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Remove an action by id and persist the queue.
    ///
    /// Returns `None` without touching the store when the id is not queued.
    pub fn remove(&mut self, id: &ActionId) -> Option<(QueuedAction, Persisted)> {
        let index = self.actions.iter().position(|a| &a.id == id)?;
        let removed = self.actions.remove(index);
        Some((removed, Persisted::from_result(self.persist())))
    }

    /// Write the whole queue to the store in a single `set`.
    pub fn persist(&mut self) -> QueueResult<()> {
        let result = encode_queue(&self.actions)
            .and_then(|doc| self.store.set(self.key, &doc))
            .map_err(QueueError::Persist);
        self.dirty = result.is_err();
        result
    }

    /// Returns true if memory holds changes the store has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Access the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn load<S: KeyValueStore>(store: &S, key: &str) -> QueueResult<Vec<QueuedAction>> {
    match store.get(key).map_err(QueueError::Load)? {
        Some(raw) => decode_queue(&raw).map_err(QueueError::Load),
        None => Ok(Vec::new()),
    }
}
