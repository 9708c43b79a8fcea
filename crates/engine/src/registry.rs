// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Symbolic reference resolution.
//!
//! Descriptors name their targets symbolically (`path` for a plugin
//! class, a step's `ref` for a plugin or an imported callable). The
//! registry maps those references to plugin factories and method
//! callables at load time; an unknown reference is daemon-fatal.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use trident_core::{ArgMap, Plugin, PluginError, PluginOutput};

/// Constructs a fresh plugin instance per runner.
pub type PluginFactory = Arc<dyn Fn() -> Box<dyn Plugin> + Send + Sync>;

/// An imported callable used by method steps. Methods have no cancel
/// token; a long-running method is uninterruptible.
pub type MethodFn = Arc<dyn Fn(&ArgMap) -> Result<PluginOutput, PluginError> + Send + Sync>;

/// Errors from reference resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to find a plugin named '{0}'")]
    UnknownPlugin(String),
    #[error("failed to find a method named '{0}'")]
    UnknownMethod(String),
}

#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<String, PluginFactory>,
    methods: HashMap<String, MethodFn>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_plugin<F>(&mut self, reference: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Plugin> + Send + Sync + 'static,
    {
        self.plugins.insert(reference.into(), Arc::new(factory));
    }

    pub fn register_method<F>(&mut self, reference: impl Into<String>, method: F)
    where
        F: Fn(&ArgMap) -> Result<PluginOutput, PluginError> + Send + Sync + 'static,
    {
        self.methods.insert(reference.into(), Arc::new(method));
    }

    /// Construct a plugin instance for a symbolic reference.
    pub fn resolve_plugin(&self, reference: &str) -> Result<Box<dyn Plugin>, ResolveError> {
        let factory = self
            .plugins
            .get(reference)
            .ok_or_else(|| ResolveError::UnknownPlugin(reference.to_string()))?;
        Ok(factory())
    }

    pub fn resolve_method(&self, reference: &str) -> Result<MethodFn, ResolveError> {
        self.methods
            .get(reference)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownMethod(reference.to_string()))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
