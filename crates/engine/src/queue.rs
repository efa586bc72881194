// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending job queue.

use std::collections::VecDeque;

use br_core::{JobId, PackageId};

/// Ordered sequence of pending jobs, without duplicates.
///
/// Normal submissions join the tail and are served first-in first-out.
/// Jobs pushed to the head are served next, ahead of everything already
/// waiting.
#[derive(Debug, Default, Clone)]
pub struct JobQueue {
    items: VecDeque<JobId>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job. Returns false if it is already queued.
    pub fn enqueue_tail(&mut self, job: JobId) -> bool {
        if self.contains(&job) {
            return false;
        }
        self.items.push_back(job);
        true
    }

    /// Prepend a job so it is dequeued next. Returns false if it is already queued.
    pub fn enqueue_head(&mut self, job: JobId) -> bool {
        if self.contains(&job) {
            return false;
        }
        self.items.push_front(job);
        true
    }

    pub fn contains(&self, job: &JobId) -> bool {
        self.items.contains(job)
    }

    /// True when a queued job builds `id`, alone or as part of a batch.
    pub fn covers(&self, id: &PackageId) -> bool {
        self.items.iter().any(|job| job.covers(id))
    }

    pub fn dequeue_next(&mut self) -> Option<JobId> {
        self.items.pop_front()
    }

    /// Pending jobs in the order they will be served.
    pub fn snapshot(&self) -> Vec<JobId> {
        self.items.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
