// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mid-stream cancellation: the store keeps a clean prefix of the
//! stream, and a checkpoint exists exactly when the plugin exposes state.

use crate::prelude::*;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

#[tokio::test]
async fn infinite_stream_is_stopped_and_a_prefix_survives() {
    let dir = TempDir::new().unwrap();
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir.path()}
            },
            "plugins": {"test0": {"path": "tests.plugins.infinite"}}
        })),
        &test_registry(),
    )
    .unwrap();

    daemon.start_all_runners();
    tokio::time::sleep(Duration::from_millis(100)).await;
    daemon.stop_all_runners();

    let store = store_on_disk(&dir.path().join("test0.json"));
    let run = results(&store, "test0", "0");
    assert!(!run.is_empty(), "some prefix of the stream must be stored");
    // The prefix is contiguous and in production order
    for i in 0..run.len() as u64 {
        assert_eq!(run[&i.to_string()], json!(i));
    }
    // The plugin exposes no state: no checkpoint is written
    assert!(!dir.path().join("test0.checkpoint.json").exists());
}

#[tokio::test]
async fn stateful_plugin_checkpoints_on_stop() {
    let dir = TempDir::new().unwrap();
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir.path()}
            },
            "plugins": {"test0": {"path": "tests.plugins.stateful"}}
        })),
        &test_registry(),
    )
    .unwrap();

    daemon.start_all_runners();
    tokio::time::sleep(Duration::from_millis(100)).await;
    daemon.stop_all_runners();

    // Give the cancelled drive loop a moment to capture its snapshot,
    // then checkpoint again via the runner's own graceful-stop path
    tokio::time::sleep(Duration::from_millis(100)).await;

    let checkpoint = dir.path().join("test0.checkpoint.json");
    assert!(checkpoint.exists(), "stateful plugin must leave a checkpoint");
    let snapshot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&checkpoint).unwrap()).unwrap();
    assert!(snapshot["offset"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn cancel_before_start_records_nothing() {
    let dir = TempDir::new().unwrap();
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir.path()}
            },
            "plugins": {"test0": {"path": "tests.plugins.counter"}}
        })),
        &test_registry(),
    )
    .unwrap();

    daemon.handle("test0").unwrap().cancel.set();
    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    if dir.path().join("test0.json").exists() {
        let store = store_on_disk(&dir.path().join("test0.json"));
        let run = store["runners"]["test0"]["results"].get("0");
        assert!(run.map_or(true, |r| r.as_object().is_some_and(serde_json::Map::is_empty)));
    }
}
