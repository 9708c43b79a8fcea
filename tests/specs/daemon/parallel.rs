// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Five parallel plugins, per-runner stores: no cross-contamination.

use crate::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

fn five_plugins(dir: &std::path::Path) -> serde_json::Value {
    let mut plugins = serde_json::Map::new();
    for i in 0..5 {
        plugins.insert(
            format!("test{i}"),
            json!({
                "path": "tests.plugins.counter",
                "args": {
                    "store": {"path_store": dir, "no_store": false, "global_store": null},
                    "runner": {"dont_store_on_error": false}
                }
            }),
        );
    }
    json!({
        "args": {"daemon": {"workers": 5}},
        "plugins": plugins
    })
}

#[tokio::test]
async fn each_runner_writes_only_its_own_file() {
    let dir = TempDir::new().unwrap();
    let mut daemon =
        TridentDaemon::new(settings(five_plugins(dir.path())), &test_registry()).unwrap();

    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    for i in 0..5 {
        let id = format!("test{i}");
        let store_path = dir.path().join(format!("{id}.json"));
        assert!(store_path.exists(), "store for {id} must exist");

        let store = store_on_disk(&store_path);
        let runners = store["runners"].as_object().unwrap();
        assert_eq!(runners.len(), 1, "no cross-contamination in {id}.json");
        assert_eq!(results(&store, &id, "0").len(), 10);
    }
}
