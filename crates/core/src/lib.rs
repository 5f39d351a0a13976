// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ireport-core: Shared library for the iReport offline sync engine
//!
//! This crate provides the data model for deferred mutations and the durable
//! key-value store they are persisted in, used by the `ireport` CLI and any
//! other embedder of the sync engine.

pub mod action;
pub mod error;
pub mod store;

pub use action::{
    decode_queue, encode_queue, Action, ActionId, ActionKind, Category, ImageRef, NewComment,
    NewIncident, ProfilePatch, QueuedAction, ReactionToggle, ReactionType, StoredQueue,
    StoredRecord, QUEUE_FORMAT_VERSION,
};
pub use error::{Error, Result};
pub use store::{keys, KeyValueStore, MemoryStore, SqliteStore};
