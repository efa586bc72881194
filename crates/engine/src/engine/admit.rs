// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission: submissions, batches, and special jobs

use br_core::{JobId, PackageId, SpecialJob};

use super::{label, Engine};
use crate::error::EngineError;
use crate::supervisor::Supervisor;

impl<S: Supervisor> Engine<S> {
    /// Store an uploaded source and, if `build` is set, queue it.
    ///
    /// Uploads whose content is already built, queued, or building are
    /// dropped without queuing; the id is returned either way. The original
    /// file name is recorded in both cases.
    pub fn submit(
        &mut self,
        name: &str,
        bytes: &[u8],
        build: bool,
    ) -> Result<PackageId, EngineError> {
        let incoming = self.store.receive(name, bytes)?;
        let job = JobId::from(incoming.id.clone());

        if self.store.has_binary(&incoming.id) || self.is_busy(&incoming.id) {
            self.audit.append(&label(&job), "skipping");
            return Ok(self.store.discard(incoming));
        }

        let id = self.store.accept(incoming)?;
        if build {
            self.store.purge(&id)?;
            self.queue.enqueue_tail(job.clone());
            self.audit.append(&label(&job), "queuing");
        }
        Ok(id)
    }

    /// Queue stored sources to be built together by one toolchain run.
    ///
    /// Every id must already have a stored source. Duplicates are dropped,
    /// as are members already queued or building; what remains is queued as
    /// one job, or as an ordinary package job if a single id is left. When
    /// every member is busy nothing is queued and the requested job is
    /// returned.
    pub fn submit_batch(&mut self, ids: Vec<PackageId>) -> Result<JobId, EngineError> {
        if let Some(missing) = ids.iter().find(|id| !self.store.has_source(id)) {
            return Err(EngineError::UnknownPackage(missing.clone()));
        }
        let requested = JobId::batch(ids)?;

        let (busy, idle): (Vec<PackageId>, Vec<PackageId>) =
            requested.packages().iter().cloned().partition(|id| self.is_busy(id));
        if idle.is_empty() {
            self.audit.append(&label(&requested), "skipping");
            return Ok(requested);
        }
        for id in busy {
            self.audit.append(&label(&JobId::from(id)), "skipping - already queued or running");
        }

        let job = JobId::batch(idle)?;
        for id in job.packages() {
            self.store.purge(id)?;
        }
        self.queue.enqueue_tail(job.clone());
        tracing::info!(job = %job, members = job.packages().len(), "batch queued");
        self.audit.append(&label(&job), "queuing");
        Ok(job)
    }

    /// Queue a special job ahead of everything else.
    ///
    /// Refused when the same job is already queued, or when any other job is
    /// active. Returns whether the job was queued.
    pub fn queue_special(&mut self, special: SpecialJob) -> bool {
        let job = JobId::from(special);
        let name = special.to_string();

        if self.queue.contains(&job) {
            self.audit.append(&name, "skipping - already queued");
            return false;
        }
        if self.active_job().is_some_and(|active| *active != job) {
            self.audit.append(&name, "skipping - already running");
            return false;
        }

        self.queue.enqueue_head(job);
        self.audit.append(&name, "queuing");
        true
    }
}
