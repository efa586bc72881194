// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory layout under the server root.
//!
//! ```text
//! <root>/lib/         toolchain's private package library
//! <root>/source/<id>  submitted source blobs
//! <root>/binary/<id>  built binaries (written by the toolchain)
//! <root>/info/<id>    JSON info/error records
//! <root>/filename/<id> original upload file names
//! <root>/incoming/    scratch space for uploads
//! <root>/log/<id>     build logs, plus the `queue` audit trail
//! ```

use br_core::{JobId, PackageId, PackageKind};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Name of the audit trail file inside `log/`.
pub const QUEUE_LOG: &str = "queue";

/// Path construction for every managed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lib(&self) -> PathBuf {
        self.root.join("lib")
    }

    pub fn source(&self) -> PathBuf {
        self.root.join("source")
    }

    pub fn binary(&self) -> PathBuf {
        self.root.join("binary")
    }

    pub fn info(&self) -> PathBuf {
        self.root.join("info")
    }

    pub fn filename(&self) -> PathBuf {
        self.root.join("filename")
    }

    pub fn incoming(&self) -> PathBuf {
        self.root.join("incoming")
    }

    pub fn log(&self) -> PathBuf {
        self.root.join("log")
    }

    /// Every directory owned by the store, in teardown order.
    pub fn managed_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.info(),
            self.filename(),
            self.lib(),
            self.source(),
            self.binary(),
            self.log(),
            self.incoming(),
        ]
    }

    /// Create any missing managed directory.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in self.managed_dirs() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Directory listed for a package kind.
    pub fn kind_dir(&self, kind: PackageKind) -> PathBuf {
        match kind {
            PackageKind::Source => self.source(),
            PackageKind::Binary => self.binary(),
            PackageKind::Library => self.lib(),
        }
    }

    pub fn source_path(&self, id: &PackageId) -> PathBuf {
        self.source().join(id.as_str())
    }

    pub fn binary_path(&self, id: &PackageId) -> PathBuf {
        self.binary().join(id.as_str())
    }

    pub fn info_path(&self, id: &PackageId) -> PathBuf {
        self.info().join(id.as_str())
    }

    pub fn filename_path(&self, id: &PackageId) -> PathBuf {
        self.filename().join(id.as_str())
    }

    /// Build log for a job.
    ///
    /// Batch ids can be arbitrarily long, so their combined log is keyed by
    /// a digest of the joined id instead of the id itself.
    pub fn log_path(&self, job: &JobId) -> PathBuf {
        match job {
            JobId::Batch(_) => {
                let digest = Sha256::digest(job.to_string().as_bytes());
                self.log().join(format!("batch-{:x}", digest))
            }
            _ => self.log().join(job.to_string()),
        }
    }

    pub fn queue_log_path(&self) -> PathBuf {
        self.log().join(QUEUE_LOG)
    }
}

/// Reduce a client-supplied file name to a safe base name.
///
/// Keeps only the final path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`. Leading dots are stripped so the result is
/// never hidden or a relative path component.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
