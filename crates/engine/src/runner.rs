// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runner: drives one plugin instance.
//!
//! A runner invokes the plugin entry point, pulls its lazy result stream
//! one value at a time, and evaluates each result: filter, record in the
//! store, hand to the notification dispatcher. The cancel token is
//! inspected between pulls, before evaluation, and before recording, so a
//! stop signal abandons the current result gracefully.
//!
//! ```text
//! Created → Started → (Streaming | ScalarResolved | NoResult) → Finalizing → Done
//!                 ↘ FailedInInit                                   ↗
//!                 ↘ Cancelled (cancel-token set) ─────────────────→
//! ```
//!
//! Plugin-runtime errors are contained here: with `dont_store_on_error`
//! unset the accumulated results survive and the runner finalizes
//! normally; set, the error propagates to the daemon and the in-memory
//! store is dropped with the runner.

use crate::{FinalizeQueue, RunnerError};
use parking_lot::Mutex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trident_adapters::Dispatcher;
use trident_core::{
    filter_args, ArgMap, CancelToken, Capabilities, Plugin, PluginOutput, ResultFilter,
    ResultStream, RunnerId,
};
use trident_storage::DataStore;

/// A runner's store handle. `None` in no-store mode. Shared with the
/// daemon so the stop path can flush whatever is in memory.
pub type SharedStore = Arc<Mutex<Option<DataStore>>>;

/// Last state snapshot captured from the plugin, for the daemon's stop
/// path to checkpoint.
pub type SharedState = Arc<Mutex<Option<Value>>>;

/// Per-runner policy from the `runner` config block.
#[derive(Debug, Default)]
pub struct RunnerPolicy {
    pub dont_store_on_error: bool,
    pub filter: ResultFilter,
}

/// The daemon's view of a runner: everything needed for cancellation,
/// finalization and the stop path, without owning the plugin.
#[derive(Clone)]
pub struct RunnerHandle {
    pub id: RunnerId,
    pub cancel: CancelToken,
    pub store: SharedStore,
    pub state: SharedState,
    /// Resolved store file path, when the store is enabled.
    pub store_path: Option<PathBuf>,
    pub(crate) started: Arc<AtomicBool>,
}

impl RunnerHandle {
    /// Whether the runner's drive loop ever began. Runners cancelled
    /// while waiting for a worker never start; the stop path skips their
    /// stores.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

pub struct Runner {
    id: RunnerId,
    plugin: Box<dyn Plugin>,
    args: ArgMap,
    policy: RunnerPolicy,
    cancel: CancelToken,
    store: SharedStore,
    notifier: Arc<Dispatcher>,
    queue: FinalizeQueue,
    state: SharedState,
    started: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(
        id: RunnerId,
        plugin: Box<dyn Plugin>,
        args: ArgMap,
        policy: RunnerPolicy,
        store: SharedStore,
        notifier: Arc<Dispatcher>,
        queue: FinalizeQueue,
    ) -> Self {
        Self {
            id,
            plugin,
            args,
            policy,
            cancel: CancelToken::new(),
            store,
            notifier,
            queue,
            state: SharedState::default(),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &RunnerId {
        &self.id
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn handle(&self) -> RunnerHandle {
        RunnerHandle {
            id: self.id.clone(),
            cancel: self.cancel.clone(),
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
            store_path: resolved_store_path(&self.store),
            started: Arc::clone(&self.started),
        }
    }

    /// Drive the plugin to completion, cancellation, or error.
    pub fn drive(mut self) -> Result<(), RunnerError> {
        self.started.store(true, Ordering::SeqCst);
        tracing::info!(runner = %self.id, "starting runner");
        let caps = self.plugin.capabilities();
        if !caps.accepts_cancel {
            tracing::warn!(
                runner = %self.id,
                "plugin does not accept the cancel token and cannot be interrupted once started"
            );
        }
        if caps.has_state {
            self.restore_state();
        }

        let mut sink = ResultSink::new(
            self.id.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            self.policy.filter.clone(),
            self.cancel.clone(),
        );

        let outcome = if self.cancel.is_set() {
            tracing::info!(runner = %self.id, "cancelled before start");
            Ok(())
        } else {
            let args = filter_args(&self.args, caps.accepted_args);
            match self.plugin.execute(&args, &self.cancel) {
                Err(e) => {
                    tracing::error!(runner = %self.id, error = %e, "runner encountered error");
                    Err(RunnerError::Plugin(e))
                }
                Ok(PluginOutput::None) => {
                    tracing::warn!(runner = %self.id, "no results were returned from the plugin");
                    Ok(())
                }
                Ok(PluginOutput::Scalar(value)) => {
                    sink.evaluate(&value);
                    Ok(())
                }
                Ok(PluginOutput::Stream(stream)) => self.consume(stream, &mut sink),
            }
        };

        if let Err(e) = outcome {
            if self.policy.dont_store_on_error {
                return Err(e);
            }
            tracing::info!(runner = %self.id, "exited with error, storing results up until error");
        }
        self.finalize(caps);
        Ok(())
    }

    /// Pull the stream until exhaustion, error, or cancellation.
    fn consume(&self, mut stream: ResultStream, sink: &mut ResultSink) -> Result<(), RunnerError> {
        loop {
            if self.cancel.is_set() {
                tracing::info!(runner = %self.id, "stop signal observed, ending stream");
                return Ok(());
            }
            match stream.next() {
                None => return Ok(()),
                Some(Ok(value)) => {
                    sink.evaluate(&value);
                }
                Some(Err(e)) => {
                    tracing::error!(
                        runner = %self.id,
                        result_index = sink.next_index(),
                        error = %e,
                        "plugin stream raised"
                    );
                    return Err(RunnerError::Plugin(e));
                }
            }
        }
    }

    /// Capture a state snapshot, write the checkpoint on a graceful stop,
    /// and enqueue for finalization.
    fn finalize(&self, caps: Capabilities) {
        if caps.has_state {
            if let Some(snapshot) = self.plugin.state() {
                *self.state.lock() = Some(snapshot.clone());
                if self.cancel.is_set() {
                    let store = self.store.lock();
                    if let Some(store) = store.as_ref() {
                        if let Err(e) = store.save_state(&snapshot) {
                            tracing::warn!(runner = %self.id, error = %e, "failed to write checkpoint");
                        }
                    }
                }
            }
        }
        if let Some(path) = resolved_store_path(&self.store) {
            self.queue.enqueue(path, self.id.clone());
        }
        tracing::info!(runner = %self.id, "runner finished");
    }

    fn restore_state(&mut self) {
        let loaded = {
            let store = self.store.lock();
            match store.as_ref().map(DataStore::load_state) {
                Some(Ok(state)) => state,
                Some(Err(e)) => {
                    tracing::warn!(runner = %self.id, error = %e, "failed to load checkpoint");
                    None
                }
                None => None,
            }
        };
        if let Some(state) = loaded {
            tracing::debug!(runner = %self.id, "restoring checkpointed state");
            self.plugin.restore(state);
        }
    }
}

pub(crate) fn resolved_store_path(store: &SharedStore) -> Option<PathBuf> {
    store
        .lock()
        .as_ref()
        .and_then(|s| s.store_path().map(Path::to_path_buf))
}

/// Per-result evaluation shared by the plain runner and the step
/// pipeline: filter, record, notify, with cancellation checks before
/// evaluation and before recording. Result indexes advance per produced
/// value, so a filtered-out result consumes its index.
pub(crate) struct ResultSink {
    id: RunnerId,
    store: SharedStore,
    notifier: Arc<Dispatcher>,
    filter: ResultFilter,
    cancel: CancelToken,
    next_index: u64,
}

impl ResultSink {
    pub(crate) fn new(
        id: RunnerId,
        store: SharedStore,
        notifier: Arc<Dispatcher>,
        filter: ResultFilter,
        cancel: CancelToken,
    ) -> Self {
        Self {
            id,
            store,
            notifier,
            filter,
            cancel,
            next_index: 0,
        }
    }

    pub(crate) fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Evaluate one produced value. Returns true when the value was
    /// accepted (recorded and notified).
    pub(crate) fn evaluate(&mut self, value: &Value) -> bool {
        if self.cancel.is_set() {
            return false;
        }
        let index = self.next_index;
        self.next_index += 1;

        if !self.filter.matches(value) {
            tracing::warn!(
                runner = %self.id,
                result_index = index,
                "result did not match any filter pattern, dropping"
            );
            return false;
        }
        if self.cancel.is_set() {
            return false;
        }
        {
            let mut store = self.store.lock();
            if let Some(store) = store.as_mut() {
                if let Err(e) = store.record(index, value) {
                    tracing::error!(
                        runner = %self.id,
                        result_index = index,
                        error = %e,
                        "failed to record result"
                    );
                }
            }
        }
        self.notifier.dispatch(value);
        true
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
