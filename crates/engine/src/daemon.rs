// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon: constructs runners from configuration, schedules them on a
//! bounded worker pool, joins on their completion, and finalizes stores
//! serially.
//!
//! Each runner's drive loop is synchronous (a blocking pull over the
//! plugin's lazy stream) and runs under `spawn_blocking`; a semaphore
//! with `workers` permits bounds the parallelism. Closing the semaphore
//! during the stop path cancels runners that have not yet acquired a
//! permit; runners already on a worker keep running until they observe
//! the cancel token.
//!
//! Finalization is serial by construction: the join loop drains completed
//! runners one at a time and is the only actor writing store files, so no
//! two runners can race on a shared store.

use crate::runner::{RunnerHandle, RunnerPolicy, SharedStore};
use crate::{
    DaemonError, FinalizeQueue, PluginRegistry, ResolvedStep, Runner, RunnerError, StepPipeline,
    StepTarget,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use trident_adapters::Dispatcher;
use trident_config::Settings;
use trident_core::{
    CheckpointArgs, PluginDescriptor, ResultFilter, RunnerId, StepDescriptor, StepKind,
};
use trident_storage::DataStore;

pub struct TridentDaemon {
    queue: FinalizeQueue,
    semaphore: Arc<Semaphore>,
    handles: IndexMap<RunnerId, RunnerHandle>,
    pending: Vec<PreparedRunner>,
    tasks: JoinSet<(RunnerId, Result<(), RunnerError>)>,
}

/// A fully-initialized runner waiting for a worker.
enum PreparedRunner {
    Plain(Runner),
    Pipeline(StepPipeline),
}

impl PreparedRunner {
    fn id(&self) -> &RunnerId {
        match self {
            PreparedRunner::Plain(runner) => runner.id(),
            PreparedRunner::Pipeline(pipeline) => pipeline.id(),
        }
    }

    fn handle(&self) -> RunnerHandle {
        match self {
            PreparedRunner::Plain(runner) => runner.handle(),
            PreparedRunner::Pipeline(pipeline) => pipeline.handle(),
        }
    }

    fn drive(self) -> Result<(), RunnerError> {
        match self {
            PreparedRunner::Plain(runner) => runner.drive(),
            PreparedRunner::Pipeline(pipeline) => pipeline.drive(),
        }
    }
}

impl TridentDaemon {
    /// Initialize all runners from the settings. Any failure here
    /// (validation, plugin resolution, store or notification setup) is
    /// fatal for the whole daemon; nothing starts.
    pub fn new(mut settings: Settings, registry: &PluginRegistry) -> Result<Self, DaemonError> {
        settings.apply_defaults();
        settings.propagate();
        settings.validate()?;

        let queue = FinalizeQueue::new();
        let mut handles = IndexMap::new();
        let mut pending = Vec::new();
        for (id, descriptor) in &settings.plugins {
            if descriptor.disabled {
                tracing::info!(plugin = %id, "plugin is disabled, skipping");
                continue;
            }
            tracing::info!(plugin = %id, "initializing plugin");
            let prepared = build_runner(id, descriptor, registry, queue.clone())?;
            handles.insert(RunnerId::new(id), prepared.handle());
            pending.push(prepared);
        }
        tracing::info!(
            "initialized ({}) out of ({}) plugins",
            pending.len(),
            settings.plugins.len()
        );

        Ok(Self {
            queue,
            semaphore: Arc::new(Semaphore::new(settings.workers())),
            handles,
            pending,
            tasks: JoinSet::new(),
        })
    }

    /// Submit every runner to the worker pool.
    pub fn start_all_runners(&mut self) {
        for prepared in self.pending.drain(..) {
            let id = prepared.id().clone();
            let semaphore = Arc::clone(&self.semaphore);
            self.tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        tracing::debug!(runner = %id, "worker pool closed before runner started");
                        return (id, Ok(()));
                    }
                };
                let task_id = id.clone();
                match tokio::task::spawn_blocking(move || prepared.drive()).await {
                    Ok(result) => (task_id, result),
                    Err(e) => (task_id, Err(RunnerError::Join(e.to_string()))),
                }
            });
        }
    }

    /// Join runners in completion order, finalizing each one's store.
    ///
    /// A propagated runner error stops the join loop; runners already on
    /// a worker keep running per their contract, but no further stores
    /// are finalized.
    pub async fn wait_for_runners(&mut self) -> Result<(), DaemonError> {
        while let Some(joined) = self.tasks.join_next().await {
            let (id, result) = joined.map_err(|e| DaemonError::Join(e.to_string()))?;
            result?;
            self.finalize_runner(&id);
        }
        Ok(())
    }

    /// Stop path: set every cancel token, cancel not-yet-started runners,
    /// flush whatever the running ones have in memory, and write state
    /// checkpoints. The pool is shut down without waiting.
    pub fn stop_all_runners(&mut self) {
        for handle in self.handles.values() {
            tracing::debug!(runner = %handle.id, "sending stop signal");
            handle.cancel.set();
        }
        self.semaphore.close();

        for handle in self.handles.values() {
            if !handle.is_started() {
                continue;
            }
            let mut guard = handle.store.lock();
            let Some(store) = guard.as_mut() else {
                continue;
            };
            if let Err(e) = store.merge() {
                tracing::warn!(runner = %handle.id, error = %e, "failed to merge store during shutdown");
            }
            if let Err(e) = store.flush() {
                tracing::error!(runner = %handle.id, error = %e, "failed to write store during shutdown");
            }
            if let Some(snapshot) = handle.state.lock().as_ref() {
                if let Err(e) = store.save_state(snapshot) {
                    tracing::warn!(runner = %handle.id, error = %e, "failed to write checkpoint during shutdown");
                }
            }
        }

        self.tasks.detach_all();
        tracing::info!("all runners signalled to stop");
    }

    pub fn runner_ids(&self) -> impl Iterator<Item = &RunnerId> {
        self.handles.keys()
    }

    pub fn handle(&self, id: &str) -> Option<&RunnerHandle> {
        self.handles.get(id)
    }

    pub fn finalize_queue(&self) -> &FinalizeQueue {
        &self.queue
    }

    /// Finalize one completed runner: merge the on-disk state beneath the
    /// in-memory state, write, and dequeue. A write failure leaves the
    /// runner queued so a later sweep can reattempt.
    fn finalize_runner(&self, id: &RunnerId) {
        let Some(handle) = self.handles.get(id) else {
            return;
        };
        let Some(path) = handle.store_path.as_ref() else {
            return;
        };
        if !self.queue.contains(path, id) {
            return;
        }
        let mut guard = handle.store.lock();
        let Some(store) = guard.as_mut() else {
            return;
        };
        if let Err(e) = store.merge() {
            tracing::warn!(runner = %id, error = %e, "failed to merge store before finalization");
        }
        match store.flush() {
            Ok(()) => self.queue.remove(path, id),
            Err(e) => {
                tracing::error!(
                    runner = %id,
                    error = %e,
                    "failed to write store, finalization will be reattempted"
                );
            }
        }
    }
}

/// Build one runner (plain or pipeline) from its descriptor.
fn build_runner(
    id: &str,
    descriptor: &PluginDescriptor,
    registry: &PluginRegistry,
    queue: FinalizeQueue,
) -> Result<PreparedRunner, DaemonError> {
    let runner_id = RunnerId::new(id);

    let store_args = &descriptor.args.store;
    let store_path = if store_args.no_store() {
        None
    } else {
        let base = store_args
            .path_store
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"));
        // A relative global store lands inside the store directory; an
        // absolute one is used as-is.
        Some(match &store_args.global_store {
            Some(global) => base.join(global),
            None => base,
        })
    };
    let checkpoint_path = checkpoint_path(&runner_id, &descriptor.args.checkpoint, store_path.as_deref());

    let store = DataStore::open(runner_id.clone(), store_path.as_deref(), checkpoint_path)
        .map_err(|source| DaemonError::Store {
            runner: runner_id.clone(),
            source,
        })?;
    let store: SharedStore = Arc::new(Mutex::new(store));

    let notifier =
        Dispatcher::resolve(&descriptor.args.notification, id).map_err(|source| {
            DaemonError::Notify {
                runner: runner_id.clone(),
                source,
            }
        })?;
    let notifier = Arc::new(notifier);

    let filter = match &descriptor.args.runner.filter_results {
        Some(patterns) => ResultFilter::compile(patterns)?,
        None => ResultFilter::default(),
    };
    let policy = RunnerPolicy {
        dont_store_on_error: descriptor.args.runner.dont_store_on_error(),
        filter,
    };

    if let Some(path) = &descriptor.path {
        let plugin = registry.resolve_plugin(path)?;
        Ok(PreparedRunner::Plain(Runner::new(
            runner_id,
            plugin,
            descriptor.plugin_args.clone(),
            policy,
            store,
            notifier,
            queue,
        )))
    } else {
        let steps = descriptor
            .steps
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|step| resolve_step(step, registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PreparedRunner::Pipeline(StepPipeline::new(
            runner_id,
            steps,
            descriptor.plugin_args.clone(),
            policy,
            store,
            notifier,
            queue,
        )))
    }
}

fn resolve_step(
    step: &StepDescriptor,
    registry: &PluginRegistry,
) -> Result<ResolvedStep, DaemonError> {
    let target = match step.instruction.kind {
        StepKind::Plugin => StepTarget::Plugin(registry.resolve_plugin(&step.instruction.reference)?),
        StepKind::Method => StepTarget::Method(registry.resolve_method(&step.instruction.reference)?),
    };
    Ok(ResolvedStep {
        name: step.name.clone(),
        target,
        args: step.instruction.args.clone(),
        out: step.instruction.out.clone(),
    })
}

/// Checkpoint file path for a runner. Defaults to
/// `<store dir>/<runner_id>.checkpoint.json` next to the store; disabled
/// along with the store unless configured explicitly.
fn checkpoint_path(
    runner_id: &RunnerId,
    args: &CheckpointArgs,
    store_path: Option<&std::path::Path>,
) -> Option<PathBuf> {
    if args.no_checkpoint {
        return None;
    }
    let file_name = format!("{runner_id}.checkpoint.json");
    match &args.path_checkpoint {
        Some(path) if path.is_dir() => Some(path.join(file_name)),
        Some(path) => Some(path.clone()),
        None => {
            let base = store_path?;
            if base.is_dir() {
                Some(base.join(file_name))
            } else {
                let parent = base.parent().filter(|p| !p.as_os_str().is_empty())?;
                Some(parent.join(file_name))
            }
        }
    }
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
