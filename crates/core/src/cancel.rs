// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-once cancellation token shared between the daemon, a runner, and
//! its plugin.
//!
//! The token has exactly two states: unset and set. Setting it is
//! irreversible; there is no reset. Runners inspect it between result
//! pulls, before result evaluation, and before recording. Plugins that
//! declare `accepts_cancel` receive a clone and are expected to observe it
//! cooperatively.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag. Cheap to clone; all clones observe one state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token. Idempotent; the flag never goes back to unset.
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
