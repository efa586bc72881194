// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission and deduplication tests

use super::*;

#[test]
fn identical_bytes_yield_identical_id() {
    let mut ctx = setup();
    let first = ctx.submit(b"same content");
    let second = ctx.submit(b"same content");

    assert_eq!(first, second);
    assert_eq!(first, PackageId::of_bytes(b"same content"));
    assert_eq!(ctx.engine.queue_status(), vec![job(&first)]);
    assert!(ctx.audit().contains("skipping"));
}

#[test]
fn submission_stores_source_and_filename() {
    let mut ctx = setup();
    let id = ctx.engine.submit("mypkg_0.1.tar.gz", b"bytes", true).unwrap();

    assert_eq!(ctx.engine.store().filename(&id).unwrap().as_deref(), Some("mypkg_0.1.tar.gz"));
    assert!(ctx.engine.store().has_source(&id));
    assert_eq!(ctx.engine.status(&id), JobStatus::Pending);
    assert_eq!(ctx.engine.info(&id).unwrap(), InfoLookup::InProgress(JobStatus::Pending));
}

#[test]
fn submission_without_build_is_not_queued() {
    let mut ctx = setup();
    let id = ctx.engine.submit("pkg.tar.gz", b"bytes", false).unwrap();

    assert!(ctx.engine.queue_status().is_empty());
    assert!(ctx.engine.store().has_source(&id));
    // A stored but unqueued source looks like an abandoned build
    assert_eq!(ctx.engine.status(&id), JobStatus::Running);
}

#[test]
fn submission_of_active_package_is_skipped() {
    let mut ctx = setup();
    let id = ctx.submit(b"building");
    ctx.engine.advance();
    assert_eq!(ctx.engine.active_job(), Some(&job(&id)));

    ctx.submit(b"building");

    assert!(ctx.engine.queue_status().is_empty());
    assert_eq!(ctx.engine.status(&id), JobStatus::Running);
}

#[test]
fn submission_of_built_package_is_skipped() {
    let mut ctx = setup();
    let id = ctx.submit(b"built");
    ctx.engine.advance();
    std::fs::write(ctx.engine.store().layout().binary_path(&id), b"binary").unwrap();
    ctx.finish_active(0);

    ctx.submit(b"built");

    assert!(ctx.engine.queue_status().is_empty());
    assert_eq!(ctx.engine.status(&id), JobStatus::Complete);
    assert!(std::fs::read_dir(ctx.engine.store().layout().incoming()).unwrap().next().is_none());
}

#[test]
fn resubmission_after_failure_purges_error() {
    let mut ctx = setup();
    let id = ctx.submit(b"flaky");
    ctx.engine.advance();
    ctx.finish_active(1);
    assert_eq!(ctx.engine.status(&id), JobStatus::Error);

    ctx.submit(b"flaky");

    assert_eq!(ctx.engine.status(&id), JobStatus::Pending);
    assert!(!ctx.engine.store().has_info(&id));
    assert_eq!(ctx.engine.store().log(&job(&id), None).unwrap(), None);
}

#[test]
fn batch_of_stored_sources_is_queued_once() {
    let mut ctx = setup();
    let a = ctx.engine.submit("a.tar.gz", b"a", false).unwrap();
    let b = ctx.engine.submit("b.tar.gz", b"b", false).unwrap();

    let batch = ctx.engine.submit_batch(vec![a.clone(), b.clone()]).unwrap();
    let again = ctx.engine.submit_batch(vec![a.clone(), b.clone()]).unwrap();

    assert_eq!(batch, again);
    assert!(matches!(batch, JobId::Batch(_)));
    assert_eq!(ctx.engine.queue_status(), vec![batch]);
    assert_eq!(ctx.engine.status(&a), JobStatus::Pending);
    assert_eq!(ctx.engine.status(&b), JobStatus::Pending);
}

#[test]
fn batch_with_unknown_member_is_rejected() {
    let mut ctx = setup();
    let a = ctx.engine.submit("a.tar.gz", b"a", false).unwrap();
    let missing = PackageId::of_bytes(b"missing");

    let result = ctx.engine.submit_batch(vec![a, missing.clone()]);

    assert!(matches!(result, Err(EngineError::UnknownPackage(id)) if id == missing));
    assert!(ctx.engine.queue_status().is_empty());
}

#[test]
fn batch_of_one_is_a_package_job() {
    let mut ctx = setup();
    let a = ctx.engine.submit("a.tar.gz", b"a", false).unwrap();
    let job_id = ctx.engine.submit_batch(vec![a.clone(), a.clone()]).unwrap();
    assert_eq!(job_id, job(&a));
}

#[test]
fn empty_batch_is_invalid() {
    let mut ctx = setup();
    assert!(matches!(ctx.engine.submit_batch(vec![]), Err(EngineError::InvalidId(_))));
}

#[test]
fn member_of_queued_batch_is_not_requeued() {
    let mut ctx = setup();
    let a = ctx.engine.submit("a.tar.gz", b"a", false).unwrap();
    let b = ctx.engine.submit("b.tar.gz", b"b", false).unwrap();
    let batch = ctx.engine.submit_batch(vec![a, b]).unwrap();

    ctx.submit(b"a");

    assert_eq!(ctx.engine.queue_status(), vec![batch]);
}

#[test]
fn batch_leaves_building_member_alone() {
    let mut ctx = setup();
    let a = ctx.submit(b"a");
    ctx.engine.advance();
    assert_eq!(ctx.engine.active_job(), Some(&job(&a)));
    let b = ctx.engine.submit("b.tar.gz", b"b", false).unwrap();

    let queued = ctx.engine.submit_batch(vec![a.clone(), b.clone()]).unwrap();

    assert_eq!(queued, job(&b));
    assert_eq!(ctx.engine.queue_status(), vec![job(&b)]);
    assert!(ctx.engine.store().log(&job(&a), None).unwrap().is_some());
    assert!(ctx.audit().contains("skipping - already queued or running"));
}

#[test]
fn overlapping_batches_never_queue_a_package_twice() {
    let mut ctx = setup();
    let a = ctx.engine.submit("a.tar.gz", b"a", false).unwrap();
    let b = ctx.engine.submit("b.tar.gz", b"b", false).unwrap();
    let c = ctx.engine.submit("c.tar.gz", b"c", false).unwrap();
    let first = ctx.engine.submit_batch(vec![a.clone(), b.clone()]).unwrap();

    let reversed = ctx.engine.submit_batch(vec![b.clone(), a.clone()]).unwrap();
    let overlapping = ctx.engine.submit_batch(vec![b.clone(), c.clone()]).unwrap();

    assert_eq!(reversed, JobId::batch(vec![b, a]).unwrap());
    assert_eq!(overlapping, job(&c));
    assert_eq!(ctx.engine.queue_status(), vec![first, job(&c)]);
}

#[test]
fn batch_behind_queued_package_skips_it() {
    let mut ctx = setup();
    let blocker = ctx.submit(b"blocker");
    ctx.engine.advance();
    let a = ctx.submit(b"a");
    let b = ctx.engine.submit("b.tar.gz", b"b", false).unwrap();
    let c = ctx.engine.submit("c.tar.gz", b"c", false).unwrap();

    let queued = ctx.engine.submit_batch(vec![a.clone(), b.clone(), c.clone()]).unwrap();

    assert_eq!(ctx.engine.active_job(), Some(&job(&blocker)));
    assert_eq!(queued, JobId::batch(vec![b, c]).unwrap());
    assert_eq!(ctx.engine.queue_status(), vec![job(&a), queued]);
}
