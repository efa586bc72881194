// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-addressed store keyed by package id.
//!
//! Presence of a file is the fact: a binary means the build succeeded, an
//! info record means it failed (or the toolchain left details), a source
//! means it was accepted. Nothing here is reclaimed except by [`Store::reset`].

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use br_core::{InfoRecord, JobId, PackageId, PackageKind, SourceInfo};
use thiserror::Error;

use crate::layout::{sanitize_filename, Layout};

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed info record for {id}: {source}")]
    MalformedInfo {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no original filename recorded for {0}")]
    MissingFilename(String),

    #[error("no binary filename recorded for {0}")]
    MissingBinaryName(String),
}

/// An upload written to scratch space, hashed, and with its original name recorded.
///
/// Either [`Store::accept`] it into `source/` or [`Store::discard`] it.
#[derive(Debug)]
pub struct Incoming {
    pub id: PackageId,
    pub filename: String,
    path: PathBuf,
}

/// Filesystem-backed package store.
#[derive(Debug, Clone)]
pub struct Store {
    layout: Layout,
}

impl Store {
    /// Open the store at `root`, creating missing directories.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let layout = Layout::new(root);
        layout.ensure()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Write an upload to scratch space and record its original file name.
    ///
    /// The name is recorded under `filename/<id>` whether or not the source
    /// is later accepted.
    pub fn receive(&self, name: &str, bytes: &[u8]) -> Result<Incoming, StoreError> {
        let filename = sanitize_filename(name);
        let id = PackageId::of_bytes(bytes);
        let path = self.layout.incoming().join(format!("{}-{}", id.short(16), filename));
        fs::write(&path, bytes)?;
        self.write_atomic(&self.layout.filename_path(&id), filename.as_bytes())?;
        Ok(Incoming { id, filename, path })
    }

    /// Move an upload into `source/<id>`.
    pub fn accept(&self, incoming: Incoming) -> Result<PackageId, StoreError> {
        fs::rename(&incoming.path, self.layout.source_path(&incoming.id))?;
        Ok(incoming.id)
    }

    /// Drop an upload's scratch file.
    pub fn discard(&self, incoming: Incoming) -> PackageId {
        if let Err(e) = fs::remove_file(&incoming.path) {
            tracing::warn!(path = %incoming.path.display(), error = %e, "failed to remove upload");
        }
        incoming.id
    }

    pub fn has_source(&self, id: &PackageId) -> bool {
        self.layout.source_path(id).is_file()
    }

    pub fn has_binary(&self, id: &PackageId) -> bool {
        self.layout.binary_path(id).is_file()
    }

    pub fn has_info(&self, id: &PackageId) -> bool {
        self.layout.info_path(id).is_file()
    }

    /// Path of the stored source, if present.
    pub fn source_file(&self, id: &PackageId) -> Option<PathBuf> {
        Some(self.layout.source_path(id)).filter(|p| p.is_file())
    }

    /// Path of the built binary, if present.
    pub fn binary_file(&self, id: &PackageId) -> Option<PathBuf> {
        Some(self.layout.binary_path(id)).filter(|p| p.is_file())
    }

    /// Path of a downloadable artifact, if present.
    pub fn artifact_file(&self, id: &PackageId, kind: PackageKind) -> Option<PathBuf> {
        match kind {
            PackageKind::Source => self.source_file(id),
            PackageKind::Binary => self.binary_file(id),
            PackageKind::Library => None,
        }
    }

    pub fn info(&self, id: &PackageId) -> Result<Option<InfoRecord>, StoreError> {
        let Some(text) = read_optional(&self.layout.info_path(id))? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::MalformedInfo { id: id.to_string(), source })
    }

    pub fn write_info(&self, id: &PackageId, record: &InfoRecord) -> Result<(), StoreError> {
        let json = serde_json::to_vec(record)
            .map_err(|source| StoreError::MalformedInfo { id: id.to_string(), source })?;
        self.write_atomic(&self.layout.info_path(id), &json)
    }

    /// Original file name recorded at submission.
    pub fn filename(&self, id: &PackageId) -> Result<Option<String>, StoreError> {
        read_optional(&self.layout.filename_path(id))
    }

    pub fn source_info(&self, id: &PackageId) -> Result<Option<SourceInfo>, StoreError> {
        Ok(self
            .filename(id)?
            .map(|filename_source| SourceInfo { hash_source: id.to_string(), filename_source }))
    }

    /// Build log for a job, optionally only its last `tail` lines.
    pub fn log(&self, job: &JobId, tail: Option<usize>) -> Result<Option<String>, StoreError> {
        Ok(read_optional(&self.layout.log_path(job))?.map(|text| tail_lines(&text, tail)))
    }

    /// The queue audit trail, optionally only its last `tail` lines.
    pub fn queue_log(&self, tail: Option<usize>) -> Result<Option<String>, StoreError> {
        Ok(read_optional(&self.layout.queue_log_path())?.map(|text| tail_lines(&text, tail)))
    }

    /// Remove a package's info record and log so a resubmission starts clean.
    pub fn purge(&self, id: &PackageId) -> Result<(), StoreError> {
        remove_optional(&self.layout.info_path(id))?;
        remove_optional(&self.layout.log_path(&JobId::from(id.clone())))?;
        Ok(())
    }

    /// Stored entries of a kind, sorted, optionally translated to file names.
    ///
    /// Sources translate through the recorded upload name, binaries through
    /// the `filename_binary` field of their info record. Library entries are
    /// never translated.
    pub fn list(&self, kind: PackageKind, translate: bool) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.layout.kind_dir(kind))? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        if !translate || kind == PackageKind::Library {
            return Ok(names);
        }

        names
            .into_iter()
            .map(|name| {
                let id = PackageId::parse(&name).map_err(|_| match kind {
                    PackageKind::Binary => StoreError::MissingBinaryName(name.clone()),
                    _ => StoreError::MissingFilename(name.clone()),
                })?;
                match kind {
                    PackageKind::Binary => self
                        .info(&id)?
                        .and_then(|info| info.filename_binary)
                        .ok_or(StoreError::MissingBinaryName(name)),
                    _ => self.filename(&id)?.ok_or(StoreError::MissingFilename(name)),
                }
            })
            .collect()
    }

    /// Destroy every managed directory and recreate them empty.
    pub fn reset(&self) -> Result<(), StoreError> {
        for dir in self.layout.managed_dirs() {
            match fs::remove_dir_all(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.layout.ensure()?;
        Ok(())
    }

    /// Write via a scratch file and rename so readers never see a partial file.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let component = |p: Option<&Path>| {
            p.and_then(Path::file_name).map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
        };
        let tmp = self.layout.incoming().join(format!(
            ".{}-{}.tmp",
            component(path.parent()),
            component(Some(path))
        ));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_optional(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Last `n` lines of `text`, line endings preserved.
fn tail_lines(text: &str, n: Option<usize>) -> String {
    match n {
        Some(n) => {
            let lines: Vec<&str> = text.split_inclusive('\n').collect();
            let start = lines.len().saturating_sub(n);
            lines[start..].concat()
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
