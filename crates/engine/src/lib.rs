// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! br-engine: job queue, process supervision, and the orchestration engine

mod engine;
mod error;
pub mod log_split;
mod queue;
mod queue_logger;
mod supervisor;
mod toolchain;

pub use engine::{Engine, InfoLookup, Tick};
pub use error::EngineError;
pub use log_split::{split_log, BATCH_MARKER};
pub use queue::JobQueue;
pub use queue_logger::QueueLogger;
pub use supervisor::{Launched, ProcessSupervisor, Supervisor, SupervisorError};
pub use toolchain::{RscriptToolchain, Toolchain, R_LIBS_USER};

#[cfg(any(test, feature = "test-support"))]
pub use supervisor::{FakeLaunch, FakeSupervisor};
#[cfg(any(test, feature = "test-support"))]
pub use toolchain::ScriptToolchain;
