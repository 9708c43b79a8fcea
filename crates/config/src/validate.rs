// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration validation.

use crate::{ConfigError, Settings};

impl Settings {
    /// Validate the fully-assembled settings (after overrides, defaults
    /// and propagation). Any error here aborts startup: the daemon never
    /// runs on a configuration it cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verbose() && self.quiet() {
            return Err(ConfigError::ConflictingLogging);
        }
        if self.logging_level.is_some() && self.quiet() {
            tracing::warn!("logging level was overridden by the quiet flag");
        }
        if self.logging_level.is_some() && self.verbose() {
            tracing::warn!("logging level was overridden by the verbose flag");
        }

        let workers = self.workers();
        if workers == 0 {
            return Err(ConfigError::InvalidWorkers(workers));
        }

        if self.args.store.no_store() && self.args.store.global_store.is_some() {
            return Err(ConfigError::ConflictingStore("args.store".to_string()));
        }

        if self.plugins.is_empty() {
            tracing::warn!("no plugins were specified");
        }
        for (id, descriptor) in &self.plugins {
            descriptor.validate(id)?;
            if descriptor.args.store.no_store() && descriptor.args.store.global_store.is_some() {
                return Err(ConfigError::ConflictingStore(id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
