// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn settings_from(raw: serde_json::Value) -> Settings {
    serde_json::from_value(raw).unwrap()
}

#[test]
fn minimal_valid_settings_pass() {
    let mut settings = settings_from(json!({
        "plugins": {"test0": {"path": "tests.plugins.counter"}}
    }));
    settings.apply_defaults();
    assert!(settings.validate().is_ok());
}

#[test]
fn zero_workers_is_rejected() {
    let settings = settings_from(json!({
        "args": {"daemon": {"workers": 0}},
        "plugins": {}
    }));
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::InvalidWorkers(0))
    ));
}

#[test]
fn verbose_and_quiet_conflict() {
    let settings = settings_from(json!({
        "args": {"trident": {"verbose": true, "quiet": true}, "daemon": {"workers": 1}},
        "plugins": {}
    }));
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::ConflictingLogging)
    ));
}

#[test]
fn global_no_store_with_global_store_conflicts() {
    let settings = settings_from(json!({
        "args": {
            "daemon": {"workers": 1},
            "store": {"no_store": true, "global_store": "global.json"}
        },
        "plugins": {}
    }));
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::ConflictingStore(_))
    ));
}

#[test]
fn per_plugin_store_conflict_is_found_after_propagation() {
    let mut settings = settings_from(json!({
        "args": {
            "daemon": {"workers": 1},
            "store": {"no_store": true}
        },
        "plugins": {
            "test0": {
                "path": "tests.plugins.counter",
                "args": {"store": {"global_store": "global.json"}}
            }
        }
    }));
    settings.propagate();
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::ConflictingStore(id)) if id == "test0"
    ));
}

#[test]
fn descriptor_errors_surface() {
    let settings = settings_from(json!({
        "args": {"daemon": {"workers": 1}},
        "plugins": {"empty": {}}
    }));
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::Descriptor(_))
    ));
}
