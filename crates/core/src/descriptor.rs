// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative plugin descriptors.
//!
//! One descriptor per plugin id in the configuration. A descriptor either
//! names a plugin class (`path`) or an ordered list of steps (`steps`),
//! never both, never neither. The nested `args` blocks configure the
//! runner's collaborators: store, checkpoint, runner policy, notification
//! handlers.
//!
//! Store and runner fields are `Option` so that propagation can tell
//! "unset" apart from an explicit `false`: global section values fill
//! per-plugin gaps without overwriting plugin-specific choices, and CLI
//! overrides win over both.

use crate::plugin::ArgMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from descriptor validation
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("plugin '{0}' declares both a path and steps")]
    BothPathAndSteps(String),
    #[error("plugin '{0}' declares neither a path nor steps")]
    MissingTarget(String),
    #[error("plugin '{plugin}' step '{step}' has an empty ref")]
    EmptyStepRef { plugin: String, step: String },
}

/// One plugin entry from the configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Symbolic reference to a plugin class. Mutually exclusive with `steps`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Ordered step list for a pipeline runner. Mutually exclusive with `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepDescriptor>>,
    /// Optional display name; the plugin id key is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Arguments passed to the plugin entry point.
    #[serde(default)]
    pub plugin_args: ArgMap,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub args: PluginArgs,
}

impl PluginDescriptor {
    /// Enforce the path-xor-steps rule and non-empty step refs.
    pub fn validate(&self, id: &str) -> Result<(), DescriptorError> {
        match (&self.path, &self.steps) {
            (Some(_), Some(_)) => return Err(DescriptorError::BothPathAndSteps(id.to_string())),
            (None, None) => return Err(DescriptorError::MissingTarget(id.to_string())),
            _ => {}
        }
        if let Some(steps) = &self.steps {
            for step in steps {
                if step.instruction.reference.is_empty() {
                    return Err(DescriptorError::EmptyStepRef {
                        plugin: id.to_string(),
                        step: step.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_pipeline(&self) -> bool {
        self.steps.is_some()
    }
}

/// Nested per-plugin configuration blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginArgs {
    #[serde(default)]
    pub store: StoreArgs,
    #[serde(default)]
    pub runner: RunnerArgs,
    #[serde(default)]
    pub checkpoint: CheckpointArgs,
    /// Notification handlers: name -> handler type -> handler config.
    #[serde(default)]
    pub notification: IndexMap<String, IndexMap<String, Value>>,
}

/// Store configuration for one runner (or the global `args.store` section).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_store: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_store: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_store: Option<PathBuf>,
}

impl StoreArgs {
    /// Fill unset fields from `other` (plugin-specific values win).
    pub fn fill_from(&mut self, other: &StoreArgs) {
        if self.path_store.is_none() {
            self.path_store = other.path_store.clone();
        }
        if self.no_store.is_none() {
            self.no_store = other.no_store;
        }
        if self.global_store.is_none() {
            self.global_store = other.global_store.clone();
        }
    }

    pub fn no_store(&self) -> bool {
        self.no_store.unwrap_or(false)
    }
}

/// Runner policy for one runner (or the global `args.runner` section).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dont_store_on_error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_results: Option<Vec<String>>,
}

impl RunnerArgs {
    /// Fill unset fields from `other` (plugin-specific values win).
    pub fn fill_from(&mut self, other: &RunnerArgs) {
        if self.dont_store_on_error.is_none() {
            self.dont_store_on_error = other.dont_store_on_error;
        }
        if self.filter_results.is_none() {
            self.filter_results = other.filter_results.clone();
        }
    }

    pub fn dont_store_on_error(&self) -> bool {
        self.dont_store_on_error.unwrap_or(false)
    }
}

/// Checkpoint configuration for one runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointArgs {
    /// Explicit checkpoint file path. Defaults to
    /// `<store dir>/<runner_id>.checkpoint.json` when checkpointing is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_checkpoint: Option<PathBuf>,
    #[serde(default)]
    pub no_checkpoint: bool,
}

/// One step of a pipeline descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub name: String,
    pub instruction: StepInstruction,
}

/// What a step executes and where its results go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInstruction {
    /// Symbolic reference: a plugin class or an imported callable.
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default)]
    pub args: ArgMap,
    /// Variable slot receiving the step's results. `None` records to the
    /// store without writing a variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Plugin,
    Method,
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
