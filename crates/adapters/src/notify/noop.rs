// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification handler.

use super::{NotifyError, NotifyHandler};
use serde_json::Value;

pub struct NoOpHandler {
    name: String,
}

impl NoOpHandler {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl NotifyHandler for NoOpHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn include_result(&self) -> bool {
        false
    }

    fn send(&self, _content: Option<&Value>) -> Result<(), NotifyError> {
        Ok(())
    }
}
