// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Five plugins sharing one global store file.

use crate::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

#[tokio::test]
async fn shared_store_collects_every_runner() {
    let dir = TempDir::new().unwrap();
    let mut plugins = serde_json::Map::new();
    for i in 0..5 {
        plugins.insert(format!("test{i}"), json!({"path": "tests.plugins.counter"}));
    }
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 5},
                "store": {
                    "path_store": dir.path(),
                    "no_store": false,
                    "global_store": "global.json"
                }
            },
            "plugins": plugins
        })),
        &test_registry(),
    )
    .unwrap();

    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    let global = dir.path().join("global.json");
    assert!(global.exists());
    // The global store is the only file written
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    let store = store_on_disk(&global);
    let runners = store["runners"].as_object().unwrap();
    assert_eq!(runners.len(), 5);
    for i in 0..5 {
        let id = format!("test{i}");
        assert_eq!(results(&store, &id, "0").len(), 10, "results for {id}");
    }
}
