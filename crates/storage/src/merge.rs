// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deep union of JSON documents.

use serde_json::Value;

/// Layer `file` beneath `mem`, in place.
///
/// Keys present only in `file` are copied over. When both sides hold an
/// object under the same key, the union recurses. Any other conflict keeps
/// the in-memory value: memory is the newer state, the file only
/// contributes what memory does not know about.
pub fn deep_union(mem: &mut Value, file: &Value) {
    let (Value::Object(mem_map), Value::Object(file_map)) = (&mut *mem, file) else {
        return;
    };
    for (key, file_value) in file_map {
        match mem_map.get_mut(key) {
            None => {
                mem_map.insert(key.clone(), file_value.clone());
            }
            Some(mem_value) if mem_value.is_object() && file_value.is_object() => {
                deep_union(mem_value, file_value);
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
