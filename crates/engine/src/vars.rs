// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step pipeline's variable map.
//!
//! Named slots carrying values between steps. Seeded from the plugin-level
//! arguments; each step with an `out` slot writes into it. The map lives
//! exactly as long as its pipeline runner.

use serde_json::Value;
use std::collections::HashMap;
use trident_core::ArgMap;

#[derive(Debug, Clone, Default)]
pub struct VariableMap {
    slots: HashMap<String, Value>,
}

impl VariableMap {
    /// Seed the map from the pipeline's plugin-level arguments.
    pub fn seed(args: &ArgMap) -> Self {
        Self {
            slots: args.clone(),
        }
    }

    /// Assign a slot. A stream step assigns the accumulated list; a
    /// scalar step assigns the value directly.
    pub fn set(&mut self, slot: &str, value: Value) {
        self.slots.insert(slot.to_string(), value);
    }

    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.slots.get(slot)
    }

    /// Union the slots into a step's call arguments. Slot values win over
    /// whatever was in `args`: a step consuming `files` wants the latest
    /// produced list, not the original seed.
    pub fn merge_into(&self, args: &mut ArgMap) {
        for (slot, value) in &self.slots {
            args.insert(slot.clone(), value.clone());
        }
    }
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
