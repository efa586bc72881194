// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! buildr daemon library
//!
//! Startup and the HTTP façade over the build engine. The `buildrd` binary
//! wires these together.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod http;
pub mod lifecycle;

pub use http::{router, spawn_ticker, SharedEngine};
pub use lifecycle::{startup, Config, DaemonState, LifecycleError};
