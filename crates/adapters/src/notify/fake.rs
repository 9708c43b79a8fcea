// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call-recording fake handler for tests.

use super::{NotifyError, NotifyHandler};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct FakeHandler {
    name: String,
    include_result: bool,
    fail: bool,
    calls: Arc<Mutex<Vec<Option<Value>>>>,
}

impl FakeHandler {
    pub fn new(name: &str, include_result: bool) -> Self {
        Self {
            name: name.to_string(),
            include_result,
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A handler whose every send fails, for containment tests.
    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, true)
        }
    }

    /// Contents passed to `send`, in call order.
    pub fn calls(&self) -> Vec<Option<Value>> {
        self.calls.lock().clone()
    }
}

impl NotifyHandler for FakeHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn include_result(&self) -> bool {
        self.include_result
    }

    fn send(&self, content: Option<&Value>) -> Result<(), NotifyError> {
        self.calls.lock().push(content.cloned());
        if self.fail {
            return Err(NotifyError::SendFailed("fake handler failure".into()));
        }
        Ok(())
    }
}
