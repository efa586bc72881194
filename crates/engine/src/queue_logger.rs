// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit trail of queue transitions.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use br_core::format_utc_now;

/// Append-only logger for the queue audit trail.
///
/// Writes human-readable timestamped lines to `<root>/log/queue`.
///
/// Each `append()` call opens, writes, and closes the file, so the trail
/// survives the log directory being recreated by a reset.
pub struct QueueLogger {
    path: PathBuf,
}

impl QueueLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append a line for the given job.
    ///
    /// Format: `2026-01-30T08:14:09Z [job] message`
    ///
    /// Failures are logged via tracing but do not propagate: logging
    /// must not break request handling.
    pub fn append(&self, job: &str, message: &str) {
        tracing::info!(job, "{}", message);
        if let Err(e) = self.write_line(job, message) {
            tracing::warn!(
                job,
                path = %self.path.display(),
                error = %e,
                "failed to write queue log"
            );
        }
    }

    fn write_line(&self, job: &str, message: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{} [{}] {}", format_utc_now(), job, message)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "queue_logger_tests.rs"]
mod tests;
