// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use br_core::SpecialJob;

fn job(bytes: &[u8]) -> JobId {
    JobId::from(PackageId::of_bytes(bytes))
}

#[test]
fn tail_jobs_are_served_in_submission_order() {
    let mut queue = JobQueue::new();
    queue.enqueue_tail(job(b"a"));
    queue.enqueue_tail(job(b"b"));
    queue.enqueue_tail(job(b"c"));

    assert_eq!(queue.snapshot(), vec![job(b"a"), job(b"b"), job(b"c")]);
    assert_eq!(queue.dequeue_next(), Some(job(b"a")));
    assert_eq!(queue.dequeue_next(), Some(job(b"b")));
    assert_eq!(queue.dequeue_next(), Some(job(b"c")));
    assert_eq!(queue.dequeue_next(), None);
}

#[test]
fn head_jobs_jump_the_line() {
    let mut queue = JobQueue::new();
    queue.enqueue_tail(job(b"a"));
    queue.enqueue_tail(job(b"b"));
    queue.enqueue_head(JobId::from(SpecialJob::Upgrade));

    assert_eq!(queue.dequeue_next(), Some(JobId::from(SpecialJob::Upgrade)));
    assert_eq!(queue.dequeue_next(), Some(job(b"a")));
}

#[test]
fn duplicates_are_refused() {
    let mut queue = JobQueue::new();
    assert!(queue.enqueue_tail(job(b"a")));
    assert!(!queue.enqueue_tail(job(b"a")));
    assert!(!queue.enqueue_head(job(b"a")));
    assert_eq!(queue.snapshot(), vec![job(b"a")]);
}

#[test]
fn covers_batch_members() {
    let a = PackageId::of_bytes(b"a");
    let b = PackageId::of_bytes(b"b");
    let mut queue = JobQueue::new();
    queue.enqueue_tail(JobId::batch(vec![a.clone(), b.clone()]).unwrap());

    assert!(queue.covers(&a));
    assert!(queue.covers(&b));
    assert!(!queue.contains(&JobId::from(a)));
    assert!(!queue.covers(&PackageId::of_bytes(b"c")));
}

#[test]
fn clear_empties_queue() {
    let mut queue = JobQueue::new();
    queue.enqueue_tail(job(b"a"));
    queue.clear();
    assert!(queue.snapshot().is_empty());
    assert_eq!(queue.dequeue_next(), None);
}
