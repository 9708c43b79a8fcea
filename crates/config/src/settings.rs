// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration tree and override application.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;
use trident_core::{PluginDescriptor, RunnerArgs, StoreArgs};

/// Default worker count when the daemon section is silent.
const DEFAULT_WORKERS: usize = 5;

/// Default per-runner store directory.
const DEFAULT_PATH_STORE: &str = "data";

/// Console log filtering levels recognized in `logging_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Debug,
}

/// One named section of the configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging_level: Option<String>,
    #[serde(default)]
    pub args: SectionArgs,
    #[serde(default)]
    pub plugins: IndexMap<String, PluginDescriptor>,
}

/// The section-level `args` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionArgs {
    #[serde(default)]
    pub trident: TridentArgs,
    #[serde(default)]
    pub daemon: DaemonArgs,
    #[serde(default)]
    pub store: StoreArgs,
    #[serde(default)]
    pub runner: RunnerArgs,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TridentArgs {
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub quiet: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaemonArgs {
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Command-line override values. Each set value wins over the config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub verbose: bool,
    pub quiet: bool,
    pub workers: Option<usize>,
    pub no_store: bool,
    pub global_store: Option<PathBuf>,
    pub path_store: Option<PathBuf>,
    pub dont_store_on_error: bool,
    pub filter_results: Vec<String>,
}

impl Settings {
    /// Effective logging level. An unrecognized value logs a warning and
    /// falls back to INFO, so a typo never silences the daemon.
    pub fn log_level(&self) -> LogLevel {
        match self.logging_level.as_deref() {
            None | Some("INFO") => LogLevel::Info,
            Some("WARNING") => LogLevel::Warning,
            Some("DEBUG") => LogLevel::Debug,
            Some(other) => {
                tracing::warn!("unrecognized logging level: '{other}', using 'INFO'");
                LogLevel::Info
            }
        }
    }

    pub fn verbose(&self) -> bool {
        self.args.trident.verbose.unwrap_or(false)
    }

    pub fn quiet(&self) -> bool {
        self.args.trident.quiet.unwrap_or(false)
    }

    /// Worker pool size, after defaults are applied.
    pub fn workers(&self) -> usize {
        self.args.daemon.workers.unwrap_or(DEFAULT_WORKERS)
    }

    /// Apply command-line overrides. Overrides write the section-level
    /// `args`; [`propagate`] then carries them into each plugin.
    ///
    /// [`propagate`]: Settings::propagate
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if overrides.verbose {
            self.args.trident.verbose = Some(true);
        }
        if overrides.quiet {
            self.args.trident.quiet = Some(true);
        }
        if let Some(workers) = overrides.workers {
            self.args.daemon.workers = Some(workers);
        }
        if overrides.no_store {
            self.args.store.no_store = Some(true);
        }
        if let Some(path) = &overrides.global_store {
            self.args.store.global_store = Some(path.clone());
        }
        if let Some(path) = &overrides.path_store {
            self.args.store.path_store = Some(path.clone());
        }
        if overrides.dont_store_on_error {
            self.args.runner.dont_store_on_error = Some(true);
        }
        if !overrides.filter_results.is_empty() {
            self.args.runner.filter_results = Some(overrides.filter_results.clone());
        }
        // Section-level overrides must also beat plugin-specific values
        for descriptor in self.plugins.values_mut() {
            if overrides.no_store {
                descriptor.args.store.no_store = Some(true);
            }
            if let Some(path) = &overrides.global_store {
                descriptor.args.store.global_store = Some(path.clone());
            }
            if let Some(path) = &overrides.path_store {
                descriptor.args.store.path_store = Some(path.clone());
            }
            if overrides.dont_store_on_error {
                descriptor.args.runner.dont_store_on_error = Some(true);
            }
            if !overrides.filter_results.is_empty() {
                descriptor.args.runner.filter_results = Some(overrides.filter_results.clone());
            }
        }
    }

    /// Fill in defaults for options nobody set, with a warning per value
    /// so the effective configuration is visible in the log.
    pub fn apply_defaults(&mut self) {
        if self.args.daemon.workers.is_none() {
            tracing::warn!("no 'daemon' args were specified, setting worker count to '{DEFAULT_WORKERS}'");
            self.args.daemon.workers = Some(DEFAULT_WORKERS);
        }
        if self.args.store.path_store.is_none() && !self.args.store.no_store() {
            tracing::warn!("no store path was specified, setting path for stores to '{DEFAULT_PATH_STORE}'");
            self.args.store.path_store = Some(PathBuf::from(DEFAULT_PATH_STORE));
        }
    }

    /// Carry the section-level `store` and `runner` blocks into every
    /// plugin descriptor, filling gaps only: plugin-specific values win.
    pub fn propagate(&mut self) {
        for descriptor in self.plugins.values_mut() {
            descriptor.args.store.fill_from(&self.args.store);
            descriptor.args.runner.fill_from(&self.args.runner);
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
