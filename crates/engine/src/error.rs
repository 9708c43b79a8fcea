// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the runtime

use crate::ResolveError;
use thiserror::Error;
use trident_adapters::NotifyError;
use trident_config::ConfigError;
use trident_core::{PluginError, RunnerId};
use trident_storage::StoreError;

/// Errors a runner surfaces to the daemon.
///
/// Plugin-runtime errors are normally contained inside the runner; they
/// only appear here when `dont_store_on_error` asks for the accumulated
/// results to be dropped and the failure to propagate.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),
    #[error("step '{step}' failed: {source}")]
    Step { step: String, source: PluginError },
    #[error("runner task failed: {0}")]
    Join(String),
}

/// Errors that stop the daemon: configuration, plugin resolution, store
/// or notification setup, and propagated runner failures.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("invalid result filter: {0}")]
    Filter(#[from] regex::Error),
    #[error("failed to initialize store for runner '{runner}': {source}")]
    Store {
        runner: RunnerId,
        #[source]
        source: StoreError,
    },
    #[error("failed to initialize notifications for runner '{runner}': {source}")]
    Notify {
        runner: RunnerId,
        #[source]
        source: NotifyError,
    },
    #[error(transparent)]
    Runner(#[from] RunnerError),
    #[error("worker pool failure: {0}")]
    Join(String),
}
