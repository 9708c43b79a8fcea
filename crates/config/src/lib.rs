// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! trident-config: Configuration file parsing and validation.
//!
//! The configuration is a JSON document of named sections; the runtime
//! picks one section by name. A section carries the logging level, the
//! `args` blocks (trident, daemon, store, runner) and the plugin
//! descriptor map. Command-line overrides win over the section, global
//! `args` fill per-plugin gaps, and plugin-specific values win over both
//! globals and defaults.

mod error;
mod parser;
mod settings;
mod validate;

pub use error::ConfigError;
pub use parser::load_config;
pub use settings::{DaemonArgs, LogLevel, Overrides, SectionArgs, Settings, TridentArgs};
