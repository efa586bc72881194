// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! br-core: identifiers, statuses and records shared by the buildr crates

pub mod macros;

pub mod command;
pub mod id;
pub mod record;
pub mod status;
pub mod time_fmt;

pub use command::CommandSpec;
pub use id::{short, IdError, JobId, PackageId, SpecialJob, BATCH_SEPARATOR};
pub use record::{InfoRecord, SourceInfo};
pub use status::{JobStatus, PackageKind};
pub use time_fmt::format_utc_now;
