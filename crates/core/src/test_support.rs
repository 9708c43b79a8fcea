// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test plugins for other crates' tests.
//!
//! Each plugin is a minimal, deterministic stand-in for one shape of
//! user-supplied work: finite streams, infinite cancel-observing streams,
//! scalars, failures, checkpointable state. Compiled only for tests or
//! under the `test-support` feature.

use crate::{ArgMap, CancelToken, Capabilities, Plugin, PluginError, PluginOutput};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Streams the integers `0..count`.
pub struct CountingPlugin {
    pub count: u64,
}

impl Plugin for CountingPlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let cancel = cancel.clone();
        let count = self.count;
        let stream: crate::ResultStream = Box::new(
            (0..count).map_while(move |i| (!cancel.is_set()).then(|| Ok(json!(i)))),
        );
        Ok(PluginOutput::Stream(stream))
    }
}

/// Streams increments forever; relies on cancellation to stop.
pub struct InfinitePlugin;

impl Plugin for InfinitePlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let cancel = cancel.clone();
        let mut i: u64 = 0;
        let stream: crate::ResultStream = Box::new(std::iter::from_fn(move || {
            if cancel.is_set() {
                return None;
            }
            let v = json!(i);
            i += 1;
            Some(Ok(v))
        }));
        Ok(PluginOutput::Stream(stream))
    }
}

/// Declares no cancellation support; streams `0..count` regardless.
pub struct UncancellablePlugin {
    pub count: u64,
}

impl Plugin for UncancellablePlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        _cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let stream: crate::ResultStream = Box::new((0..self.count).map(|i| Ok(json!(i))));
        Ok(PluginOutput::Stream(stream))
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            accepts_cancel: false,
            ..Capabilities::default()
        }
    }
}

/// Streams `ok_before_error` values, then reports a stream error.
pub struct FailingPlugin {
    pub ok_before_error: u64,
}

impl Plugin for FailingPlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        _cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let ok = self.ok_before_error;
        let mut i: u64 = 0;
        let stream: crate::ResultStream = Box::new(std::iter::from_fn(move || {
            if i < ok {
                let v = json!(i);
                i += 1;
                Some(Ok(v))
            } else if i == ok {
                i += 1;
                Some(Err(PluginError::Failed("stream failed".into())))
            } else {
                None
            }
        }));
        Ok(PluginOutput::Stream(stream))
    }
}

/// Entry point fails before producing any output.
pub struct BrokenPlugin;

impl Plugin for BrokenPlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        _cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        Err(PluginError::Failed("refused to start".into()))
    }
}

/// Returns one scalar value.
pub struct ScalarPlugin {
    pub value: Value,
}

impl Plugin for ScalarPlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        _cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        Ok(PluginOutput::Scalar(self.value.clone()))
    }
}

/// Returns the null sentinel: no results at all.
pub struct SilentPlugin;

impl Plugin for SilentPlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        _cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        Ok(PluginOutput::None)
    }
}

/// Checkpointable counter. Each run streams `count` values continuing
/// from wherever the previous run stopped.
pub struct StatefulPlugin {
    pub count: u64,
    offset: Arc<AtomicU64>,
}

impl StatefulPlugin {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            offset: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Plugin for StatefulPlugin {
    fn execute(
        &mut self,
        _args: &ArgMap,
        cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let cancel = cancel.clone();
        let offset = Arc::clone(&self.offset);
        let count = self.count;
        let mut produced: u64 = 0;
        let stream: crate::ResultStream = Box::new(std::iter::from_fn(move || {
            if cancel.is_set() || produced == count {
                return None;
            }
            produced += 1;
            let v = offset.fetch_add(1, Ordering::SeqCst);
            Some(Ok(json!(v)))
        }));
        Ok(PluginOutput::Stream(stream))
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            has_state: true,
            ..Capabilities::default()
        }
    }

    fn state(&self) -> Option<Value> {
        Some(json!({ "offset": self.offset.load(Ordering::SeqCst) }))
    }

    fn restore(&mut self, state: Value) {
        if let Some(offset) = state.get("offset").and_then(Value::as_u64) {
            self.offset.store(offset, Ordering::SeqCst);
        }
    }
}

/// Declares `accepted_args` and echoes the arguments it received as one
/// scalar result, for argument-filtering tests.
pub struct ArgEchoPlugin;

impl Plugin for ArgEchoPlugin {
    fn execute(
        &mut self,
        args: &ArgMap,
        _cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let map: serde_json::Map<String, Value> =
            args.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Ok(PluginOutput::Scalar(Value::Object(map)))
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            accepted_args: Some(&["path", "patterns"]),
            ..Capabilities::default()
        }
    }
}

/// Streams the file names (not full paths) found directly under `path`.
/// A deterministic stand-in for the directory-walking sample plugin.
pub struct ListEntriesPlugin;

impl Plugin for ListEntriesPlugin {
    fn execute(
        &mut self,
        args: &ArgMap,
        cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| PluginError::InvalidArgument {
                name: "path".into(),
                message: "expected a string".into(),
            })?
            .to_string();
        let mut names: Vec<String> = std::fs::read_dir(&path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        let cancel = cancel.clone();
        let stream: crate::ResultStream = Box::new(
            names
                .into_iter()
                .map_while(move |n| (!cancel.is_set()).then(|| Ok(json!(n)))),
        );
        Ok(PluginOutput::Stream(stream))
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            accepted_args: Some(&["path"]),
            ..Capabilities::default()
        }
    }
}
