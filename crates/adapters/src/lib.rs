// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! trident-adapters: Notification handlers and the fan-out dispatcher

pub mod notify;

pub use notify::{Dispatcher, NotifyError, NotifyHandler};

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeHandler;
