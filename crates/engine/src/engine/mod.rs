// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestration engine: admission, status, and queue progression.
//!
//! All state changes happen synchronously inside the admission methods
//! ([`Engine::submit`], [`Engine::submit_batch`], [`Engine::queue_special`])
//! and [`Engine::advance`]. Nothing blocks on the build process; callers
//! drive progress by calling `advance()` after each request or on a timer.

mod admit;
mod tick;

use std::fs::File;
use std::path::PathBuf;

use br_core::{InfoRecord, JobId, JobStatus, PackageId, SpecialJob};
use br_storage::Store;

use crate::error::EngineError;
use crate::queue::JobQueue;
use crate::queue_logger::QueueLogger;
use crate::supervisor::{ProcessSupervisor, Supervisor};
use crate::toolchain::Toolchain;

pub use tick::Tick;

/// The single in-flight job.
struct Active<H> {
    job: JobId,
    handle: H,
    log_path: Option<PathBuf>,
    /// Held open until the job is finalized.
    log: Option<File>,
}

/// Result of looking up a package's info record.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoLookup {
    Found(InfoRecord),
    /// No record yet, but the package is queued or building.
    InProgress(JobStatus),
    NotFound,
}

/// Single-worker build orchestrator.
pub struct Engine<S: Supervisor = ProcessSupervisor> {
    store: Store,
    toolchain: Box<dyn Toolchain>,
    supervisor: S,
    queue: JobQueue,
    active: Option<Active<S::Handle>>,
    audit: QueueLogger,
}

impl<S: Supervisor> Engine<S> {
    pub fn new(store: Store, toolchain: impl Toolchain + 'static, supervisor: S) -> Self {
        let audit = QueueLogger::new(store.layout().queue_log_path());
        audit.append("-", "buildr starting");
        Self {
            store,
            toolchain: Box::new(toolchain),
            supervisor,
            queue: JobQueue::new(),
            active: None,
            audit,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Status of one package.
    ///
    /// Evidence is checked in precedence order: a binary means complete, an
    /// info record means failed, queue membership (alone or in a batch)
    /// means pending, and a stored source means running.
    pub fn status(&self, id: &PackageId) -> JobStatus {
        if self.store.has_binary(id) {
            JobStatus::Complete
        } else if self.store.has_info(id) {
            JobStatus::Error
        } else if self.queue.covers(id) {
            JobStatus::Pending
        } else if self.store.has_source(id) {
            JobStatus::Running
        } else {
            JobStatus::Unknown
        }
    }

    /// Status of a special job: pending while queued, running while active.
    pub fn special_status(&self, job: SpecialJob) -> JobStatus {
        let id = JobId::from(job);
        if self.queue.contains(&id) {
            JobStatus::Pending
        } else if self.active_job() == Some(&id) {
            JobStatus::Running
        } else {
            JobStatus::Unknown
        }
    }

    /// Status of every member of a job, in order.
    pub fn job_statuses(&self, job: &JobId) -> Vec<JobStatus> {
        match job.special() {
            Some(special) => vec![self.special_status(special)],
            None => job.packages().iter().map(|id| self.status(id)).collect(),
        }
    }

    /// Pending jobs in the order they will be started.
    pub fn queue_status(&self) -> Vec<JobId> {
        self.queue.snapshot()
    }

    pub fn active_job(&self) -> Option<&JobId> {
        self.active.as_ref().map(|active| &active.job)
    }

    /// Info record for `id`, distinguishing "not yet" from "never".
    pub fn info(&self, id: &PackageId) -> Result<InfoLookup, EngineError> {
        if let Some(record) = self.store.info(id)? {
            return Ok(InfoLookup::Found(record));
        }
        Ok(match self.status(id) {
            status @ (JobStatus::Pending | JobStatus::Running) => InfoLookup::InProgress(status),
            _ => InfoLookup::NotFound,
        })
    }

    /// True when `id` is queued or building, alone or as part of a batch.
    fn is_busy(&self, id: &PackageId) -> bool {
        self.queue.covers(id) || self.active.as_ref().is_some_and(|active| active.job.covers(id))
    }
}

/// Short label for a job in the audit trail.
fn label(job: &JobId) -> String {
    match job {
        JobId::Package(id) => id.short(16).to_string(),
        JobId::Batch(ids) => {
            let first = ids.first().map(|id| id.short(16)).unwrap_or_default();
            format!("{}+{}", first, ids.len().saturating_sub(1))
        }
        JobId::Special(special) => special.to_string(),
    }
}

#[cfg(test)]
#[path = "../engine_tests/mod.rs"]
mod tests;
