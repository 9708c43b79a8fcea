// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result filtering by regular-expression patterns.
//!
//! A runner configured with `filter_results` keeps only results whose
//! string form matches at least one pattern; everything else is dropped
//! with a warning. An empty pattern set accepts everything.

use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    patterns: Vec<Regex>,
}

impl ResultFilter {
    /// Compile a pattern list. Invalid patterns are configuration errors
    /// and fail runner initialization.
    pub fn compile(patterns: &[String]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if the value passes the filter.
    pub fn matches(&self, value: &Value) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let text = string_form(value);
        self.patterns.iter().any(|p| p.is_match(&text))
    }
}

/// String form of a result value. Strings match on their content, not
/// their JSON rendering; everything else matches on compact JSON.
fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
