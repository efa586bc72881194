// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! br-storage: filesystem-backed, content-addressed package store

mod layout;
mod store;

pub use layout::{sanitize_filename, Layout, QUEUE_LOG};
pub use store::{Incoming, Store, StoreError};
