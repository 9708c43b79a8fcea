// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-index monotonicity: every fresh run lands above everything
//! already on disk.

use crate::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

async fn run_once(dir: &std::path::Path) {
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir}
            },
            "plugins": {"test0": {"path": "tests.plugins.counter"}}
        })),
        &test_registry(),
    )
    .unwrap();
    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();
}

#[tokio::test]
async fn consecutive_daemon_runs_allocate_increasing_run_indexes() {
    let dir = TempDir::new().unwrap();
    run_once(dir.path()).await;
    run_once(dir.path()).await;
    run_once(dir.path()).await;

    let store = store_on_disk(&dir.path().join("test0.json"));
    let runs = store["runners"]["test0"]["results"].as_object().unwrap();
    assert_eq!(runs.len(), 3);
    for run in ["0", "1", "2"] {
        assert_eq!(results(&store, "test0", run).len(), 10);
    }
}

#[tokio::test]
async fn hand_edited_run_keys_are_ignored_for_allocation() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("test0.json"),
        json!({"runners": {"test0": {"results": {"7": {}, "not-a-number": {}}}}}).to_string(),
    )
    .unwrap();

    run_once(dir.path()).await;

    let store = store_on_disk(&dir.path().join("test0.json"));
    assert_eq!(results(&store, "test0", "8").len(), 10);
    // The hand-edited keys survive the merge untouched
    assert!(store["runners"]["test0"]["results"]
        .as_object()
        .unwrap()
        .contains_key("not-a-number"));
}
