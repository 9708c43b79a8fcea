// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the behavioral specs.

use serde_json::Value;
use std::path::Path;
use trident_config::Settings;
use trident_core::test_support::{
    CountingPlugin, FailingPlugin, InfinitePlugin, ListEntriesPlugin, StatefulPlugin,
};
use trident_core::{ArgMap, PluginError, PluginOutput};
use trident_engine::PluginRegistry;

/// Registry of deterministic test plugins, mirroring the sample plugin
/// references a real configuration would use.
pub fn test_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register_plugin("tests.plugins.counter", || {
        Box::new(CountingPlugin { count: 10 })
    });
    registry.register_plugin("tests.plugins.infinite", || Box::new(InfinitePlugin));
    registry.register_plugin("tests.plugins.failing", || {
        Box::new(FailingPlugin { ok_before_error: 3 })
    });
    registry.register_plugin("tests.plugins.stateful", || {
        Box::new(StatefulPlugin::new(u64::MAX))
    });
    registry.register_plugin("tests.plugins.list_entries", || Box::new(ListEntriesPlugin));
    registry.register_method("tests.methods.remove_matching", remove_matching);
    registry
}

/// Removes entries under `path` whose names contain `pattern`.
fn remove_matching(args: &ArgMap) -> Result<PluginOutput, PluginError> {
    let path = args
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| PluginError::Failed("missing path".into()))?;
    let pattern = args
        .get("pattern")
        .and_then(Value::as_str)
        .ok_or_else(|| PluginError::Failed("missing pattern".into()))?;

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(pattern) {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(PluginOutput::None)
}

pub fn settings(raw: Value) -> Settings {
    serde_json::from_value(raw).unwrap()
}

pub fn store_on_disk(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

pub fn results<'a>(
    store: &'a Value,
    runner: &str,
    run: &str,
) -> &'a serde_json::Map<String, Value> {
    store["runners"][runner]["results"][run]
        .as_object()
        .unwrap_or_else(|| panic!("no results for runner '{runner}' run '{run}' in {store}"))
}
