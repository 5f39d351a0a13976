// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process lock on the state directory's queue.
//!
//! Two `ireport` processes may share one store (a running `watch` plus a
//! one-shot `queue` command). Each mutation of the queue takes this lock and
//! re-reads the store first, so neither process overwrites the other.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// Exclusive lock held until dropped.
#[derive(Debug)]
pub struct QueueLock {
    file: File,
}

impl QueueLock {
    /// Block until the lock at `path` is acquired.
    fn acquire(path: &Path) -> io::Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_exclusive()?;
        Ok(QueueLock { file })
    }

    /// Acquire the lock on a blocking thread.
    pub async fn acquire_async(path: PathBuf) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::acquire(&path))
            .await
            .map_err(io::Error::other)?
    }
}

impl Drop for QueueLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
