// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conflicting store options abort initialization; no runner starts.

use crate::prelude::*;
use serde_json::json;
use trident_engine::{DaemonError, TridentDaemon};

#[test]
fn no_store_with_global_store_fails_initialization() {
    let result = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": null, "no_store": true, "global_store": "global.json"}
            },
            "plugins": {"test0": {"path": "tests.plugins.counter"}}
        })),
        &test_registry(),
    );
    assert!(matches!(result, Err(DaemonError::Config(_))));
}

#[test]
fn per_plugin_conflict_also_fails() {
    let result = TridentDaemon::new(
        settings(json!({
            "args": {"daemon": {"workers": 5}},
            "plugins": {
                "test0": {
                    "path": "tests.plugins.counter",
                    "args": {"store": {"no_store": true, "global_store": "global.json"}}
                }
            }
        })),
        &test_registry(),
    );
    assert!(matches!(result, Err(DaemonError::Config(_))));
}
