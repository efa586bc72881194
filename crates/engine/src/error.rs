// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use br_core::{IdError, PackageId};
use br_storage::StoreError;
use thiserror::Error;

/// Errors returned to callers of [`crate::Engine`]
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid id: {0}")]
    InvalidId(#[from] IdError),

    #[error("unknown package: {0}")]
    UnknownPackage(PackageId),
}
