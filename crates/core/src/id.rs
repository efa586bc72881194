// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-addressed package identifiers and job identifiers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between member ids of a batch job.
pub const BATCH_SEPARATOR: char = ',';

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_LEN: usize = 64;

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    if s.len() <= n {
        s
    } else {
        &s[..n]
    }
}

/// Errors from parsing identifiers and kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid package id: {0:?}")]
    InvalidPackage(String),
    #[error("invalid package type: {0:?}")]
    InvalidKind(String),
    #[error("not a special job: {0:?}")]
    InvalidSpecial(String),
    #[error("empty job id")]
    Empty,
}

/// Hex digest of a submitted package's bytes.
///
/// Identical content always yields the identical id. Parsing only accepts
/// lowercase hex of the digest length, so an id is always safe to use as a
/// file name inside the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId(String);

impl PackageId {
    /// Hash the given bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    pub fn parse(s: &str) -> Result<Self, IdError> {
        let valid = s.len() == DIGEST_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(IdError::InvalidPackage(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id truncated to at most `n` characters.
    pub fn short(&self, n: usize) -> &str {
        short(&self.0, n)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PackageId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackageId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.0
    }
}

impl PartialEq<str> for PackageId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Control jobs that are not content-addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialJob {
    /// Refresh the toolchain's package library.
    Upgrade,
    /// Destroy and recreate every store directory.
    Reset,
}

crate::simple_display! {
    SpecialJob {
        Upgrade => "upgrade",
        Reset => "reset",
    }
}

crate::simple_from_str! {
    SpecialJob, IdError::InvalidSpecial {
        Upgrade => "upgrade",
        Reset => "reset",
    }
}

/// Identifier of a unit of work in the queue.
///
/// Rendered as the package id, the comma-joined member ids of a batch, or
/// the special job's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JobId {
    Package(PackageId),
    /// Two or more distinct packages built by one subprocess invocation.
    Batch(Vec<PackageId>),
    Special(SpecialJob),
}

impl JobId {
    /// Build a job from member ids, dropping duplicates while keeping order.
    ///
    /// A single member collapses to a plain package job.
    pub fn batch(ids: impl IntoIterator<Item = PackageId>) -> Result<Self, IdError> {
        let mut members: Vec<PackageId> = Vec::new();
        for id in ids {
            if !members.contains(&id) {
                members.push(id);
            }
        }
        match members.len() {
            0 => Err(IdError::Empty),
            1 => Ok(JobId::Package(members.remove(0))),
            _ => Ok(JobId::Batch(members)),
        }
    }

    /// Package ids covered by this job (empty for special jobs).
    pub fn packages(&self) -> &[PackageId] {
        match self {
            JobId::Package(id) => std::slice::from_ref(id),
            JobId::Batch(ids) => ids,
            JobId::Special(_) => &[],
        }
    }

    pub fn special(&self) -> Option<SpecialJob> {
        match self {
            JobId::Special(s) => Some(*s),
            _ => None,
        }
    }

    /// True when this job builds the given package, alone or within a batch.
    pub fn covers(&self, id: &PackageId) -> bool {
        self.packages().contains(id)
    }
}

impl From<PackageId> for JobId {
    fn from(id: PackageId) -> Self {
        JobId::Package(id)
    }
}

impl From<SpecialJob> for JobId {
    fn from(s: SpecialJob) -> Self {
        JobId::Special(s)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Package(id) => write!(f, "{}", id),
            JobId::Special(s) => write!(f, "{}", s),
            JobId::Batch(ids) => {
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", BATCH_SEPARATOR)?;
                    }
                    write!(f, "{}", id)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for JobId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if let Ok(special) = s.parse::<SpecialJob>() {
            return Ok(JobId::Special(special));
        }
        let ids = s.split(BATCH_SEPARATOR).map(PackageId::parse).collect::<Result<Vec<_>, _>>()?;
        JobId::batch(ids)
    }
}

impl TryFrom<String> for JobId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
