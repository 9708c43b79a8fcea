// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One synchronous plugin, one worker, fresh store directory.

use crate::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

#[tokio::test]
async fn ten_yields_land_under_run_zero() {
    let dir = TempDir::new().unwrap();
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir.path(), "no_store": false, "global_store": null},
                "runner": {"dont_store_on_error": false}
            },
            "plugins": {"test0": {"path": "tests.plugins.counter"}}
        })),
        &test_registry(),
    )
    .unwrap();

    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    let store_path = dir.path().join("test0.json");
    assert!(store_path.exists());
    let store = store_on_disk(&store_path);
    let run = results(&store, "test0", "0");
    assert_eq!(run.len(), 10);
    for i in 0..10u64 {
        assert_eq!(run[&i.to_string()], json!(i), "result-order fidelity at {i}");
    }
    // Exactly one run recorded
    assert_eq!(
        store["runners"]["test0"]["results"].as_object().unwrap().len(),
        1
    );
}
