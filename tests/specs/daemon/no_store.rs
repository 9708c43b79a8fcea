// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-store mode: no file is ever created, the store handle is null.

use crate::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

#[tokio::test]
async fn no_store_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir.path(), "no_store": true, "global_store": null}
            },
            "plugins": {"test0": {"path": "tests.plugins.counter"}}
        })),
        &test_registry(),
    )
    .unwrap();

    assert!(daemon.handle("test0").unwrap().store.lock().is_none());

    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
