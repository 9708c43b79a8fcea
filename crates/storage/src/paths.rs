// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store path resolution.

use crate::StoreError;
use std::path::{Path, PathBuf};
use trident_core::RunnerId;

/// Resolve a configured store path to a concrete file path.
///
/// - An existing file is used directly.
/// - Otherwise the location must be creatable: an existing directory, or a
///   nonexistent path whose parent exists. A path ending in `.json` is
///   kept as-is (the first flush creates it); anything else resolves to
///   `<path>/<runner_id>.json`.
/// - Everything else is a resolution error.
pub fn resolve_store_path(store_path: &Path, runner_id: &RunnerId) -> Result<PathBuf, StoreError> {
    if store_path.is_file() {
        tracing::debug!(path = %store_path.display(), runner = %runner_id, "using existing store");
        return Ok(store_path.to_path_buf());
    }
    let creatable =
        store_path.is_dir() || store_path.parent().is_some_and(|p| !p.as_os_str().is_empty() && p.exists());
    if creatable {
        if store_path.extension().is_some_and(|ext| ext == "json") {
            return Ok(store_path.to_path_buf());
        }
        tracing::debug!(path = %store_path.display(), runner = %runner_id, "creating store under path");
        return Ok(store_path.join(format!("{runner_id}.json")));
    }
    Err(StoreError::InvalidPath {
        path: store_path.to_path_buf(),
        runner: runner_id.clone(),
    })
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
