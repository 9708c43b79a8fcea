// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;
use trident_core::DescriptorError;

/// Errors reported at startup; the daemon does not start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("section '{section}' does not exist in config file '{}'", path.display())]
    MissingSection { section: String, path: PathBuf },
    #[error("invalid amount of workers: '{0}', value must be greater than 0")]
    InvalidWorkers(usize),
    #[error("can't both use verbose logging and quiet logging")]
    ConflictingLogging,
    #[error("can't both use global store and no store options ({0})")]
    ConflictingStore(String),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}
