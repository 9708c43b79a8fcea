// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notification handler using notify-rust.
//!
//! On macOS, `notify-rust` uses `mac-notification-sys` (Cocoa bindings) to
//! send notifications via the Notification Center. The first notification
//! triggers `ensure_application_set()` which runs an AppleScript to look up
//! a bundle identifier. In a daemon context without Automation permissions,
//! that AppleScript blocks forever. We pre-set the bundle identifier at
//! construction time to bypass the lookup entirely.

use super::{NotifyError, NotifyHandler};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
struct DesktopConfig {
    summary: Option<String>,
    #[serde(default)]
    include_result: bool,
}

pub struct DesktopHandler {
    name: String,
    summary: String,
    include_result: bool,
}

impl DesktopHandler {
    pub fn from_config(name: &str, config: &Value) -> Result<Self, NotifyError> {
        let config: DesktopConfig =
            serde_json::from_value(config.clone()).map_err(|e| NotifyError::InvalidConfig {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        #[cfg(target_os = "macos")]
        {
            // Pre-set the application bundle identifier so mac-notification-sys
            // skips its NSAppleScript lookup (which blocks forever in daemon
            // processes that lack Automation permissions).
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }

        Ok(Self {
            name: name.to_string(),
            summary: config
                .summary
                .unwrap_or_else(|| format!("Trident notification for: '{name}'")),
            include_result: config.include_result,
        })
    }
}

impl NotifyHandler for DesktopHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn include_result(&self) -> bool {
        self.include_result
    }

    fn send(&self, content: Option<&Value>) -> Result<(), NotifyError> {
        let body = match content {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        notify_rust::Notification::new()
            .summary(&self.summary)
            .body(&body)
            .show()
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
        Ok(())
    }
}
