// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The finalization queue.
//!
//! A process-wide map from store path to the ordered list of runner ids
//! awaiting finalization of that path. Runners enqueue themselves at
//! completion; the daemon dequeues during its join loop, one runner at a
//! time per path, which is what keeps a shared store file at one writer.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trident_core::RunnerId;

#[derive(Debug, Clone, Default)]
pub struct FinalizeQueue {
    inner: Arc<Mutex<HashMap<PathBuf, Vec<RunnerId>>>>,
}

impl FinalizeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a runner to the queue for its store path.
    pub fn enqueue(&self, path: PathBuf, runner: RunnerId) {
        let mut inner = self.inner.lock();
        inner.entry(path).or_default().push(runner);
    }

    pub fn contains(&self, path: &Path, runner: &RunnerId) -> bool {
        let inner = self.inner.lock();
        inner.get(path).is_some_and(|ids| ids.contains(runner))
    }

    /// Remove one runner from its path's queue after a successful write.
    pub fn remove(&self, path: &Path, runner: &RunnerId) {
        let mut inner = self.inner.lock();
        if let Some(ids) = inner.get_mut(path) {
            ids.retain(|id| id != runner);
            if ids.is_empty() {
                inner.remove(path);
            }
        }
    }

    /// Queued runners for a path, in enqueue order.
    pub fn queued(&self, path: &Path) -> Vec<RunnerId> {
        let inner = self.inner.lock();
        inner.get(path).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "finalize_tests.rs"]
mod tests;
