// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration document parsing.
//!
//! The file is a JSON object whose top-level keys are section names; the
//! runtime loads exactly one section.

use crate::{ConfigError, Settings};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;

/// Load one named section from a configuration file.
pub fn load_config(path: &Path, section: &str) -> Result<Settings, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: IndexMap<String, Value> = serde_json::from_str(&raw)?;
    let Some(section_value) = document.get(section) else {
        return Err(ConfigError::MissingSection {
            section: section.to_string(),
            path: path.to_path_buf(),
        });
    };
    let settings: Settings = serde_json::from_value(section_value.clone())?;
    tracing::debug!(section, plugins = settings.plugins.len(), "config section loaded");
    Ok(settings)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
