// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result filtering: only matching results are recorded.

use crate::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

#[tokio::test]
async fn every_recorded_value_matches_a_pattern() {
    let dir = TempDir::new().unwrap();
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir.path()},
                "runner": {"filter_results": ["^[0-3]$"]}
            },
            "plugins": {"test0": {"path": "tests.plugins.counter"}}
        })),
        &test_registry(),
    )
    .unwrap();

    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    let store = store_on_disk(&dir.path().join("test0.json"));
    let run = results(&store, "test0", "0");
    assert_eq!(run.len(), 4);
    for (index, value) in run {
        let n = value.as_u64().unwrap();
        assert!(n <= 3, "recorded value {n} must match the filter");
        // Dropped results still consumed their index, so index == value
        assert_eq!(index, &n.to_string());
    }
}
