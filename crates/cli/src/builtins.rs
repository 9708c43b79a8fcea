// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in file plugins.
//!
//! The registry every daemon starts from: a streaming directory lister
//! and a file-removal method, the classic two-step pipeline pair. The
//! symbolic references mirror the sample plugin layout
//! (`trident.files.*`).

use regex::Regex;
use serde_json::{json, Value};
use trident_core::{
    ArgMap, CancelToken, Capabilities, Plugin, PluginError, PluginOutput,
};
use trident_engine::PluginRegistry;

pub fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register_plugin("trident.files.find_files", || Box::new(FindFiles));
    registry.register_method("trident.files.remove_files", remove_files);
    registry
}

/// Streams the names of directory entries under `path`, optionally
/// filtered by regex `patterns`.
struct FindFiles;

impl Plugin for FindFiles {
    fn execute(
        &mut self,
        args: &ArgMap,
        cancel: &CancelToken,
    ) -> Result<PluginOutput, PluginError> {
        let path = required_str(args, "path")?;
        let patterns = compile_patterns(args.get("patterns"))?;

        let mut names: Vec<String> = std::fs::read_dir(&path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| matches_any(&patterns, name))
            .collect();
        names.sort();

        let cancel = cancel.clone();
        let stream: trident_core::ResultStream = Box::new(
            names
                .into_iter()
                .map_while(move |name| (!cancel.is_set()).then(|| Ok(json!(name)))),
        );
        Ok(PluginOutput::Stream(stream))
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            accepted_args: Some(&["path", "patterns"]),
            ..Capabilities::default()
        }
    }
}

/// Removes directory entries under `path` whose names match any of
/// `patterns`. Produces no results; the follow-up listing shows the
/// effect.
fn remove_files(args: &ArgMap) -> Result<PluginOutput, PluginError> {
    let path = required_str(args, "path")?;
    let patterns = compile_patterns(args.get("patterns"))?;

    for entry in std::fs::read_dir(&path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if patterns.is_empty() || !matches_any(&patterns, &name) {
            continue;
        }
        tracing::debug!(entry = %name, "removing entry");
        if entry.path().is_dir() {
            std::fs::remove_dir_all(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(PluginOutput::None)
}

fn required_str(args: &ArgMap, name: &str) -> Result<String, PluginError> {
    args.get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| PluginError::InvalidArgument {
            name: name.to_string(),
            message: "expected a string".to_string(),
        })
}

fn compile_patterns(raw: Option<&Value>) -> Result<Vec<Regex>, PluginError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(|p| {
            Regex::new(p).map_err(|e| PluginError::InvalidArgument {
                name: "patterns".to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn matches_any(patterns: &[Regex], name: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.is_match(name))
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
