// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn args(pairs: &[(&str, Value)]) -> ArgMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn collect(output: PluginOutput) -> Vec<Value> {
    match output {
        PluginOutput::Stream(stream) => stream.map(|r| r.unwrap()).collect(),
        PluginOutput::Scalar(v) => vec![v],
        PluginOutput::None => vec![],
    }
}

#[test]
fn find_files_streams_sorted_entry_names() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("beta"), "").unwrap();
    std::fs::write(dir.path().join("alpha"), "").unwrap();

    let mut plugin = FindFiles;
    let output = plugin
        .execute(
            &args(&[("path", json!(dir.path()))]),
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(collect(output), vec![json!("alpha"), json!("beta")]);
}

#[test]
fn find_files_applies_patterns() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("test"), "").unwrap();
    std::fs::write(dir.path().join("test1"), "").unwrap();
    std::fs::write(dir.path().join("other"), "").unwrap();

    let mut plugin = FindFiles;
    let output = plugin
        .execute(
            &args(&[
                ("path", json!(dir.path())),
                ("patterns", json!(["^test"])),
            ]),
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(collect(output), vec![json!("test"), json!("test1")]);
}

#[test]
fn find_files_observes_cancellation() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a"), "").unwrap();
    std::fs::write(dir.path().join("b"), "").unwrap();

    let cancel = CancelToken::new();
    let mut plugin = FindFiles;
    let output = plugin
        .execute(&args(&[("path", json!(dir.path()))]), &cancel)
        .unwrap();
    cancel.set();
    assert!(collect(output).is_empty());
}

#[test]
fn find_files_without_path_is_an_error() {
    let mut plugin = FindFiles;
    assert!(plugin.execute(&ArgMap::new(), &CancelToken::new()).is_err());
}

#[test]
fn remove_files_deletes_matching_entries_only() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("test"), "").unwrap();
    std::fs::write(dir.path().join("test1"), "").unwrap();

    let output = remove_files(&args(&[
        ("path", json!(dir.path())),
        ("patterns", json!(["test1"])),
    ]))
    .unwrap();

    assert!(matches!(output, PluginOutput::None));
    assert!(dir.path().join("test").exists());
    assert!(!dir.path().join("test1").exists());
}

#[test]
fn remove_files_without_patterns_removes_nothing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("keep"), "").unwrap();

    remove_files(&args(&[("path", json!(dir.path()))])).unwrap();
    assert!(dir.path().join("keep").exists());
}
