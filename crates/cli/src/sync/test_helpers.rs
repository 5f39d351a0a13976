// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ireport_core::{
    Action, Category, KeyValueStore, MemoryStore, NewComment, NewIncident, ProfilePatch,
    ReactionToggle, ReactionType,
};

/// Create a comment action on the given incident.
pub fn make_comment(incident_id: &str, content: &str) -> Action {
    Action::CreateComment(NewComment {
        incident_id: incident_id.to_string(),
        content: content.to_string(),
    })
}

/// Create a reaction toggle on the given incident.
pub fn make_reaction(incident_id: &str, reaction_type: ReactionType) -> Action {
    Action::ToggleReaction(ReactionToggle {
        incident_id: incident_id.to_string(),
        reaction_type,
    })
}

/// Create an incident action with the given title.
pub fn make_incident(title: &str) -> Action {
    Action::CreateIncident(NewIncident {
        title: title.to_string(),
        description: format!("Description of {}", title),
        category: Category::Damages,
        location: Some("Main library".to_string()),
        image: None,
    })
}

/// Create a profile update setting the bio.
pub fn make_profile_update(bio: &str) -> Action {
    Action::UpdateProfile(ProfilePatch {
        bio: Some(bio.to_string()),
        ..ProfilePatch::default()
    })
}

/// Memory store whose writes can be switched off to simulate a full disk.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        FlakyStore {
            inner,
            ..FlakyStore::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> ireport_core::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ireport_core::Error::StoreUnavailable("read failed".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> ireport_core::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ireport_core::Error::StoreUnavailable("disk full".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> ireport_core::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ireport_core::Error::StoreUnavailable("disk full".into()));
        }
        self.inner.remove(key)
    }
}
