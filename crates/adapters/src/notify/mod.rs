// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification handlers and the per-runner dispatcher.
//!
//! Handlers are opaque to the core: the dispatcher only relies on the
//! `send(content | none)` contract. Each handler declares whether it wants
//! the result payload included; handler failures are logged and never
//! escalate past the runner that produced the result.
//!
//! Configuration shape (per runner): `notification.<name>.<type> = {..}`.
//! Unsupported types are skipped with a warning so a typo in one handler
//! does not silence the rest; an invalid configuration for a supported
//! type fails handler resolution.

mod desktop;
mod noop;

pub use desktop::DesktopHandler;
pub use noop::NoOpHandler;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHandler;

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Errors from notification handling
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid configuration for notification '{name}': {message}")]
    InvalidConfig { name: String, message: String },
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// One configured notification sink.
pub trait NotifyHandler: Send + Sync {
    fn name(&self) -> &str;

    /// Whether `send` should receive the result payload.
    fn include_result(&self) -> bool;

    /// Deliver one notification, with the result payload when the handler
    /// asked for it.
    fn send(&self, content: Option<&Value>) -> Result<(), NotifyError>;
}

/// Fan-out of per-result notifications to every configured handler.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn NotifyHandler>>,
}

impl Dispatcher {
    pub fn new(handlers: Vec<Box<dyn NotifyHandler>>) -> Self {
        Self { handlers }
    }

    /// Resolve handlers from a runner's notification config.
    pub fn resolve(
        notifications: &IndexMap<String, IndexMap<String, Value>>,
        runner_id: &str,
    ) -> Result<Self, NotifyError> {
        let mut handlers: Vec<Box<dyn NotifyHandler>> = Vec::new();
        for (name, by_type) in notifications {
            for (handler_type, config) in by_type {
                match handler_type.to_lowercase().as_str() {
                    "desktop" => handlers.push(Box::new(DesktopHandler::from_config(name, config)?)),
                    "noop" => handlers.push(Box::new(NoOpHandler::new(name))),
                    other => {
                        tracing::warn!(
                            notification = %name,
                            runner = %runner_id,
                            "unsupported notification type: '{other}'"
                        );
                    }
                }
            }
        }
        Ok(Self { handlers })
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Send one result to every handler. Failures are logged, not raised.
    pub fn dispatch(&self, result: &Value) {
        for handler in &self.handlers {
            tracing::debug!(handler = %handler.name(), "sending notification");
            let content = handler.include_result().then_some(result);
            if let Err(e) = handler.send(content) {
                tracing::error!(
                    handler = %handler.name(),
                    error = %e,
                    "failed to send notification"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
