// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-runner data store handle.
//!
//! Results accumulate in memory under
//! `runners.<runner_id>.results.<run_index>.<result_index>`; nothing is
//! written to disk until `flush`, which the daemon calls during serial
//! finalization. A store file may host several runners when they share a
//! global store; the finalization queue guarantees one writer at a time.
//!
//! The checkpoint file is separate from the store: a free-form JSON
//! snapshot of plugin state, read on runner start and written on graceful
//! stop.

use crate::{deep_union, resolve_store_path};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use trident_core::RunnerId;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store path '{path}' does not exist for runner '{runner}'")]
    InvalidPath { path: PathBuf, runner: RunnerId },
}

/// Handle to one runner's slice of a store file, plus its checkpoint.
#[derive(Debug)]
pub struct DataStore {
    runner_id: RunnerId,
    store_path: Option<PathBuf>,
    checkpoint_path: Option<PathBuf>,
    data: Value,
    run_index: String,
}

impl DataStore {
    /// Open a store handle.
    ///
    /// Returns `Ok(None)` when both the store and the checkpoint are
    /// disabled: the runner then skips recording entirely. The store path
    /// is resolved per the rules in [`resolve_store_path`]; an existing
    /// file is read so the new run index lands above everything already
    /// recorded.
    pub fn open(
        runner_id: RunnerId,
        store_path: Option<&Path>,
        checkpoint_path: Option<PathBuf>,
    ) -> Result<Option<Self>, StoreError> {
        if store_path.is_none() && checkpoint_path.is_none() {
            return Ok(None);
        }

        let store_path = store_path
            .map(|p| resolve_store_path(p, &runner_id))
            .transpose()?;

        let mut data = match &store_path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            _ => json!({ "runners": {} }),
        };
        ensure_runner_slot(&mut data, &runner_id);
        let run_index = next_run_index(&data, &runner_id);

        tracing::debug!(runner = %runner_id, run_index = %run_index, "data store opened");
        Ok(Some(Self {
            runner_id,
            store_path,
            checkpoint_path,
            data,
            run_index,
        }))
    }

    pub fn runner_id(&self) -> &RunnerId {
        &self.runner_id
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    pub fn checkpoint_path(&self) -> Option<&Path> {
        self.checkpoint_path.as_deref()
    }

    /// Run index this handle records under, as a string key.
    pub fn run_index(&self) -> &str {
        &self.run_index
    }

    /// In-memory store document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Record one result in memory under the current run index.
    pub fn record<T: Serialize>(&mut self, result_index: u64, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        tracing::debug!(runner = %self.runner_id, result_index, "recording result");
        ensure_runner_slot(&mut self.data, &self.runner_id);
        let Some(results) = self
            .data
            .get_mut("runners")
            .and_then(|r| r.get_mut(self.runner_id.as_str()))
            .and_then(|r| r.get_mut("results"))
            .and_then(Value::as_object_mut)
        else {
            return Ok(());
        };
        let run = results
            .entry(self.run_index.clone())
            .or_insert_with(|| json!({}));
        if let Value::Object(run) = run {
            run.insert(result_index.to_string(), value);
        }
        Ok(())
    }

    /// Write the in-memory state to the store file, creating it if absent.
    /// The write replaces the file contents wholesale; call [`merge`]
    /// first when the file may hold other runners' data.
    ///
    /// [`merge`]: DataStore::merge
    pub fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.store_path else {
            return Ok(());
        };
        tracing::debug!(path = %path.display(), "writing store");
        let raw = serde_json::to_string(&self.data)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Layer the on-disk state beneath the in-memory state.
    ///
    /// A missing file contributes nothing. A malformed file is logged and
    /// skipped; the next flush overwrites it with the in-memory state.
    pub fn merge(&mut self) -> Result<(), StoreError> {
        let Some(path) = &self.store_path else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let raw = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(on_disk) => {
                tracing::debug!(path = %path.display(), "merging store with on-disk state");
                deep_union(&mut self.data, &on_disk);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "store file is malformed, skipping merge");
            }
        }
        Ok(())
    }

    /// Write the runner-state payload to the checkpoint file.
    pub fn save_state(&self, payload: &Value) -> Result<(), StoreError> {
        let Some(path) = &self.checkpoint_path else {
            tracing::debug!(runner = %self.runner_id, "no checkpoint path, state not saved");
            return Ok(());
        };
        tracing::debug!(path = %path.display(), "writing checkpoint");
        let raw = serde_json::to_string(payload)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Read the checkpoint file. A missing file (or no checkpoint path)
    /// is not an error; it simply yields nothing.
    pub fn load_state(&self) -> Result<Option<Value>, StoreError> {
        let Some(path) = &self.checkpoint_path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

/// Make sure `runners.<id>.results` exists and is an object.
fn ensure_runner_slot(data: &mut Value, runner_id: &RunnerId) {
    if !data.is_object() {
        *data = json!({});
    }
    let Some(root) = data.as_object_mut() else {
        return;
    };
    let runners = root.entry("runners").or_insert_with(|| json!({}));
    if !runners.is_object() {
        *runners = json!({});
    }
    if let Some(runners) = runners.as_object_mut() {
        let slot = runners
            .entry(runner_id.as_str())
            .or_insert_with(|| json!({ "results": {} }));
        if !slot.is_object() {
            *slot = json!({ "results": {} });
        }
        if let Some(slot) = slot.as_object_mut() {
            let results = slot.entry("results").or_insert_with(|| json!({}));
            if !results.is_object() {
                *results = json!({});
            }
        }
    }
}

/// Next run index for a runner: one past the highest integer key already
/// recorded, or `"0"` for an empty history. Non-integer keys (hand-edited
/// stores) are treated as absent.
fn next_run_index(data: &Value, runner_id: &RunnerId) -> String {
    let existing = data
        .get("runners")
        .and_then(|r| r.get(runner_id.as_str()))
        .and_then(|r| r.get("results"))
        .and_then(Value::as_object);
    let max = existing
        .into_iter()
        .flat_map(|results| results.keys())
        .filter_map(|k| k.parse::<u64>().ok())
        .max();
    match max {
        Some(n) => (n + 1).to_string(),
        None => "0".to_string(),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
