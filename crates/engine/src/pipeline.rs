// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step pipeline runner.
//!
//! A pipeline executes an ordered list of steps sharing one variable map,
//! one data store, one notifier, and one cancel token. Each step is
//! either a plugin (driven through the same per-result evaluation as a
//! plain runner) or a method (an imported callable). The call arguments
//! of every step are `plugin_args ∪ step.args ∪ variable_map`, later
//! sources winning. A step's `out` slot receives its results: a list for
//! streams, the value itself for scalars, nothing when `out` is null.
//!
//! There is no branching or looping at the step layer: steps run in
//! declaration order, a cancellation observed between steps ends the
//! pipeline, and a step failure ends it under the same
//! `dont_store_on_error` policy as a plain runner.

use crate::runner::{resolved_store_path, ResultSink};
use crate::{FinalizeQueue, MethodFn, RunnerError, RunnerHandle, RunnerPolicy, SharedState,
    SharedStore, VariableMap};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trident_adapters::Dispatcher;
use trident_core::{filter_args, ArgMap, CancelToken, Plugin, PluginError, PluginOutput,
    ResultStream, RunnerId};

/// One resolved step: the target was looked up in the registry at daemon
/// initialization, so a bad reference fails before anything runs.
pub struct ResolvedStep {
    pub name: String,
    pub target: StepTarget,
    pub args: ArgMap,
    pub out: Option<String>,
}

pub enum StepTarget {
    Plugin(Box<dyn Plugin>),
    Method(MethodFn),
}

pub struct StepPipeline {
    id: RunnerId,
    steps: Vec<ResolvedStep>,
    args: ArgMap,
    policy: RunnerPolicy,
    cancel: CancelToken,
    store: SharedStore,
    notifier: Arc<Dispatcher>,
    queue: FinalizeQueue,
    state: SharedState,
    started: Arc<AtomicBool>,
}

impl StepPipeline {
    pub fn new(
        id: RunnerId,
        steps: Vec<ResolvedStep>,
        args: ArgMap,
        policy: RunnerPolicy,
        store: SharedStore,
        notifier: Arc<Dispatcher>,
        queue: FinalizeQueue,
    ) -> Self {
        Self {
            id,
            steps,
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

    /// Execute the steps in declaration order.
    pub fn drive(mut self) -> Result<(), RunnerError> {
        self.started.store(true, Ordering::SeqCst);
        tracing::info!(runner = %self.id, steps = self.steps.len(), "starting step pipeline");
        let mut vars = VariableMap::seed(&self.args);
        let mut sink = ResultSink::new(
            self.id.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            self.policy.filter.clone(),
            self.cancel.clone(),
        );

        let steps = std::mem::take(&mut self.steps);
        let mut failure = None;
        for step in steps {
            if self.cancel.is_set() {
                tracing::info!(
                    runner = %self.id,
                    step = %step.name,
                    "stop signal observed between steps, ending pipeline"
                );
                break;
            }
            tracing::debug!(runner = %self.id, step = %step.name, "executing step");

            let mut call_args = self.args.clone();
            call_args.extend(step.args.iter().map(|(k, v)| (k.clone(), v.clone())));
            vars.merge_into(&mut call_args);

            let outcome = match step.target {
                StepTarget::Plugin(mut plugin) => {
                    let caps = plugin.capabilities();
                    if !caps.accepts_cancel {
                        tracing::warn!(
                            runner = %self.id,
                            step = %step.name,
                            "step plugin does not accept the cancel token"
                        );
                    }
                    let filtered = filter_args(&call_args, caps.accepted_args);
                    plugin.execute(&filtered, &self.cancel)
                }
                // A method gets no cancel token; once called it runs to
                // completion.
                StepTarget::Method(method) => method(&call_args),
            };

            match outcome {
                Err(e) => {
                    tracing::error!(runner = %self.id, step = %step.name, error = %e, "step failed");
                    failure = Some(RunnerError::Step {
                        step: step.name,
                        source: e,
                    });
                    break;
                }
                Ok(PluginOutput::None) => {
                    tracing::warn!(runner = %self.id, step = %step.name, "no results were returned from the step");
                }
                Ok(PluginOutput::Scalar(value)) => {
                    let accepted = sink.evaluate(&value);
                    if accepted {
                        if let Some(out) = &step.out {
                            vars.set(out, value);
                        }
                    }
                }
                Ok(PluginOutput::Stream(stream)) => {
                    if let Err(e) =
                        self.consume_step(&step.name, stream, &mut sink, step.out.as_deref(), &mut vars)
                    {
                        failure = Some(RunnerError::Step {
                            step: step.name,
                            source: e,
                        });
                        break;
                    }
                }
            }
        }

        if let Some(e) = failure {
            if self.policy.dont_store_on_error {
                return Err(e);
            }
            tracing::info!(runner = %self.id, "pipeline exited with error, storing results up until error");
        }
        self.finalize();
        Ok(())
    }

    /// Pull one step's stream, accumulating accepted values for its `out`
    /// slot.
    fn consume_step(
        &self,
        step: &str,
        mut stream: ResultStream,
        sink: &mut ResultSink,
        out: Option<&str>,
        vars: &mut VariableMap,
    ) -> Result<(), PluginError> {
        let mut collected: Vec<Value> = Vec::new();
        let result = loop {
            if self.cancel.is_set() {
                tracing::info!(runner = %self.id, step, "stop signal observed, ending stream");
                break Ok(());
            }
            match stream.next() {
                None => break Ok(()),
                Some(Ok(value)) => {
                    let accepted = sink.evaluate(&value);
                    if accepted && out.is_some() {
                        collected.push(value);
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(
                        runner = %self.id,
                        step,
                        result_index = sink.next_index(),
                        error = %e,
                        "step stream raised"
                    );
                    break Err(e);
                }
            }
        };
        if let Some(out) = out {
            vars.set(out, Value::Array(collected));
        }
        result
    }

    fn finalize(&self) {
        if let Some(path) = resolved_store_path(&self.store) {
            self.queue.enqueue(path, self.id.clone());
        }
        tracing::info!(runner = %self.id, "step pipeline finished");
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
