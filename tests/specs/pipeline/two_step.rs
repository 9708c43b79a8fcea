// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-step pipeline: a plugin step lists a directory into a variable
//! slot, a method step removes matching entries. A re-run of the listing
//! shows the removal and the store file that appeared in the meantime.

use crate::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use trident_engine::TridentDaemon;

fn pipeline_settings(dir: &std::path::Path) -> serde_json::Value {
    json!({
        "args": {
            "daemon": {"workers": 1},
            "store": {"path_store": dir}
        },
        "plugins": {
            "pipe": {
                "plugin_args": {"path": dir},
                "steps": [
                    {
                        "name": "find",
                        "instruction": {
                            "ref": "tests.plugins.list_entries",
                            "type": "plugin",
                            "out": "files"
                        }
                    },
                    {
                        "name": "remove",
                        "instruction": {
                            "ref": "tests.methods.remove_matching",
                            "type": "method",
                            "args": {"pattern": "test1"},
                            "out": null
                        }
                    }
                ]
            }
        }
    })
}

#[tokio::test]
async fn find_then_remove_then_find_again() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("test"), "").unwrap();
    std::fs::write(dir.path().join("test1"), "").unwrap();

    let mut daemon =
        TridentDaemon::new(settings(pipeline_settings(dir.path())), &test_registry()).unwrap();
    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    let store_path = dir.path().join("pipe.json");
    let store = store_on_disk(&store_path);
    let run = results(&store, "pipe", "0");
    assert_eq!(run.len(), 2);
    assert_eq!(run["0"], json!("test"));
    assert_eq!(run["1"], json!("test1"));

    // The method step removed the matching entry
    assert!(dir.path().join("test").exists());
    assert!(!dir.path().join("test1").exists());

    // Re-run the listing step alone: test1 is gone, the store file is now present
    let mut daemon = TridentDaemon::new(
        settings(json!({
            "args": {
                "daemon": {"workers": 1},
                "store": {"path_store": dir.path()}
            },
            "plugins": {
                "pipe": {
                    "path": "tests.plugins.list_entries",
                    "plugin_args": {"path": dir.path()}
                }
            }
        })),
        &test_registry(),
    )
    .unwrap();
    daemon.start_all_runners();
    daemon.wait_for_runners().await.unwrap();

    let store = store_on_disk(&store_path);
    let rerun = results(&store, "pipe", "1");
    let mut values: Vec<String> = rerun
        .values()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    values.sort();
    assert_eq!(values, vec!["pipe.json".to_string(), "test".to_string()]);
}
