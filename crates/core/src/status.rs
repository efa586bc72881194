// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status and package kinds.

use crate::id::IdError;
use serde::{Deserialize, Serialize};

/// Logical state of a package id, derived from store and queue contents.
///
/// Evidence is checked in the order `Complete`, `Error`, `Pending`,
/// `Running`, `Unknown`; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Nothing is known about the id
    Unknown,
    /// Enqueued, not yet started
    Pending,
    /// Source stored, no result yet and not queued
    Running,
    /// Binary produced
    Complete,
    /// Failure record written
    Error,
}

impl JobStatus {
    /// Binary or info presence: the store never reclaims these on its own.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

crate::simple_display! {
    JobStatus {
        Unknown => "UNKNOWN",
        Pending => "PENDING",
        Running => "RUNNING",
        Complete => "COMPLETE",
        Error => "ERROR",
    }
}

/// Kinds of stored package collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageKind {
    Source,
    Binary,
    /// The toolchain's private library (listing only)
    Library,
}

impl PackageKind {
    /// Library contents are directories owned by the toolchain.
    pub fn is_downloadable(self) -> bool {
        !matches!(self, PackageKind::Library)
    }
}

crate::simple_display! {
    PackageKind {
        Source => "source",
        Binary => "binary",
        Library => "library",
    }
}

crate::simple_from_str! {
    PackageKind, IdError::InvalidKind {
        Source => "source",
        Binary => "binary",
        Library => "library",
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
