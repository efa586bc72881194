// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue progression: polling, finalization, and dispatch

use std::path::{Path, PathBuf};

use br_core::{InfoRecord, JobId, SpecialJob};

use super::{label, Active, Engine};
use crate::log_split::write_split_logs;
use crate::supervisor::Supervisor;

/// Exit code recorded for jobs that could not be launched or polled.
const LAUNCH_FAILED: i32 = -1;

/// What one call to [`Engine::advance`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Jobs finalized during this tick, with their exit codes.
    pub finished: Vec<(JobId, i32)>,
    /// Job dequeued and dispatched during this tick.
    pub started: Option<JobId>,
}

impl<S: Supervisor> Engine<S> {
    /// Poll the active job and, once the slot is free, start the next one.
    ///
    /// Never blocks. At most one job is dequeued per call.
    pub fn advance(&mut self) -> Tick {
        let mut tick = Tick::default();

        if let Some(mut active) = self.active.take() {
            let code = match self.supervisor.poll(&mut active.handle) {
                Ok(None) => {
                    tracing::debug!(job = %active.job, "still running");
                    self.active = Some(active);
                    return tick;
                }
                Ok(Some(code)) => code,
                Err(e) => {
                    tracing::error!(job = %active.job, error = %e, "lost track of build process");
                    LAUNCH_FAILED
                }
            };
            drop(active.log);
            self.finalize(&active.job, active.log_path.as_deref(), code);
            tick.finished.push((active.job, code));
        }

        if let Some(job) = self.queue.dequeue_next() {
            self.start(job, &mut tick);
        }
        tick
    }

    fn start(&mut self, job: JobId, tick: &mut Tick) {
        self.audit.append(&label(&job), "starting");
        tick.started = Some(job.clone());

        let layout = self.store.layout().clone();
        let (command, log_path) = match job.special() {
            Some(SpecialJob::Upgrade) => (self.toolchain.upgrade(&layout), None),
            Some(SpecialJob::Reset) => {
                let reset = self.reset();
                match (reset, self.toolchain.bootstrap(&layout)) {
                    (Ok(()), Some(command)) => (command, None),
                    (result, _) => {
                        let code = if result.is_ok() { 0 } else { LAUNCH_FAILED };
                        self.finalize(&job, None, code);
                        tick.finished.push((job, code));
                        return;
                    }
                }
            }
            None => (self.toolchain.build(&job, &layout), Some(layout.log_path(&job))),
        };

        match self.supervisor.launch(&command, log_path.as_deref()) {
            Ok(launched) => {
                tracing::info!(job = %job, program = %command.program, "build started");
                self.active =
                    Some(Active { job, handle: launched.handle, log_path, log: launched.log });
            }
            Err(e) => {
                tracing::error!(job = %job, error = %e, "failed to launch");
                self.finalize(&job, log_path.as_deref(), LAUNCH_FAILED);
                tick.finished.push((job, LAUNCH_FAILED));
            }
        }
    }

    /// Drop everything pending and recreate the store empty.
    fn reset(&mut self) -> Result<(), br_storage::StoreError> {
        self.queue.clear();
        let result = self.store.reset();
        match &result {
            Ok(()) => self.audit.append(&SpecialJob::Reset.to_string(), "reset"),
            Err(e) => tracing::error!(error = %e, "failed to reset store"),
        }
        result
    }

    fn finalize(&mut self, job: &JobId, log_path: Option<&Path>, code: i32) {
        self.audit.append(&label(job), &format!("complete with code {}", code));
        tracing::info!(job = %job, code, "build finished");

        if let (JobId::Batch(members), Some(path)) = (job, log_path) {
            let log_dir: PathBuf = self.store.layout().log();
            if let Err(e) = write_split_logs(path, &log_dir, members) {
                tracing::warn!(job = %job, error = %e, "failed to split batch log");
            }
        }

        if code == 0 {
            return;
        }
        if job.special().is_some() {
            tracing::warn!(job = %job, code, "special job failed");
            return;
        }

        for id in job.packages() {
            if self.store.has_binary(id) || self.store.has_info(id) {
                continue;
            }
            let filename = self.store.filename(id).unwrap_or_else(|e| {
                tracing::warn!(id = %id, error = %e, "failed to read original filename");
                None
            });
            if let Err(e) = self.store.write_info(id, &InfoRecord::failure(id, filename)) {
                tracing::warn!(id = %id, error = %e, "failed to write info record");
            }
        }
    }
}
