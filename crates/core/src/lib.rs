// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! trident-core: Domain types for the Trident monitoring daemon

pub mod cancel;
pub mod descriptor;
pub mod filter;
pub mod id;
pub mod plugin;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cancel::CancelToken;
pub use descriptor::{
    CheckpointArgs, DescriptorError, PluginArgs, PluginDescriptor, RunnerArgs, StepDescriptor,
    StepInstruction, StepKind, StoreArgs,
};
pub use filter::ResultFilter;
pub use id::RunnerId;
pub use plugin::{
    filter_args, ArgMap, Capabilities, Plugin, PluginError, PluginOutput, ResultStream,
};
