// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console logging setup.
//!
//! Precedence: `--quiet` disables logging entirely, `--verbose` forces
//! DEBUG, otherwise `logging_level` from the config section applies.
//! `TRIDENT_LOG` overrides everything for ad-hoc debugging.

use tracing_subscriber::EnvFilter;
use trident_config::{LogLevel, Settings};

pub fn init(settings: &Settings) {
    if settings.quiet() {
        return;
    }
    let default_filter = if settings.verbose() {
        "debug"
    } else {
        match settings.log_level() {
            LogLevel::Debug => "debug",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
        }
    };
    let filter = EnvFilter::try_from_env("TRIDENT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
