// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The plugin contract.
//!
//! A plugin is a user-supplied unit of work with a single entry point. The
//! entry point receives the plugin's declared arguments plus a cancellation
//! token and produces either nothing, a single value, or a lazy pull-based
//! stream of values. The runner never requires a particular plugin shape
//! beyond this trait; capabilities (cancellation support, state accessors,
//! accepted argument names) are declared by the plugin and normalized at
//! the runner boundary.

use crate::CancelToken;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Arguments passed to a plugin entry point or method step.
///
/// Values are JSON-compatible; the step pipeline merges its variable map
/// into this before each call.
pub type ArgMap = HashMap<String, Value>;

/// Lazy result stream returned by a streaming plugin.
///
/// Cold, single-pass, possibly infinite. `None` is end-of-stream;
/// `Some(Err)` is a plugin-runtime error. The two are distinct on purpose:
/// exhaustion finalizes normally while an error obeys the runner's
/// `dont_store_on_error` policy.
pub type ResultStream = Box<dyn Iterator<Item = Result<Value, PluginError>> + Send>;

/// Errors raised inside a plugin entry point or stream.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("{0}")]
    Failed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },
}

/// What an entry point returned.
pub enum PluginOutput {
    /// The null sentinel: the plugin produced nothing. Logged by the
    /// runner, which then finalizes.
    None,
    /// A single value, recorded at result index 0.
    Scalar(Value),
    /// A lazy sequence of values, pulled one at a time.
    Stream(ResultStream),
}

impl std::fmt::Debug for PluginOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginOutput::None => write!(f, "None"),
            PluginOutput::Scalar(v) => write!(f, "Scalar({v})"),
            PluginOutput::Stream(_) => write!(f, "Stream(..)"),
        }
    }
}

/// Capability set discovered at load time.
///
/// Plugins vary in whether they observe the cancel token, whether they
/// expose restorable state, and which argument names their entry point
/// declares. Rather than requiring a base type per variation, the runner
/// reads this set and adapts.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// The plugin cooperatively observes the cancel token. When false the
    /// runner logs a warning: once started, the plugin is uninterruptible.
    pub accepts_cancel: bool,
    /// The plugin exposes `state`/`restore` for checkpointing.
    pub has_state: bool,
    /// Argument names the entry point declares. `Some(names)` makes the
    /// runner drop every argument not listed; `None` passes everything
    /// through. Filtering matters for pipeline steps, where the variable
    /// map is merged into the call and may carry unrelated slots.
    pub accepted_args: Option<&'static [&'static str]>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            accepts_cancel: true,
            has_state: false,
            accepted_args: None,
        }
    }
}

/// A constructed plugin instance. Owned by exactly one runner; dropped
/// when the runner completes.
pub trait Plugin: Send {
    /// The entry point. Called once per run with the filtered arguments
    /// and a clone of the runner's cancel token.
    fn execute(&mut self, args: &ArgMap, cancel: &CancelToken)
        -> Result<PluginOutput, PluginError>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Snapshot of restorable plugin state for checkpointing.
    fn state(&self) -> Option<Value> {
        None
    }

    /// Restore a previously checkpointed snapshot. Called before
    /// `execute` when a checkpoint file exists.
    fn restore(&mut self, _state: Value) {}
}

/// Keep only the arguments the entry point declares.
///
/// Extras are dropped silently: the pipeline variable map is merged into
/// every step call and routinely carries slots the target never asked for.
pub fn filter_args(args: &ArgMap, accepted: Option<&[&str]>) -> ArgMap {
    match accepted {
        None => args.clone(),
        Some(names) => args
            .iter()
            .filter(|(k, _)| names.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
