// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Special job exclusivity and dispatch tests

use super::*;

fn upgrade() -> JobId {
    JobId::from(SpecialJob::Upgrade)
}

fn reset() -> JobId {
    JobId::from(SpecialJob::Reset)
}

#[test]
fn upgrade_accepted_when_idle() {
    let mut ctx = setup();
    assert!(ctx.engine.queue_special(SpecialJob::Upgrade));
    assert_eq!(ctx.engine.queue_status(), vec![upgrade()]);
    assert_eq!(ctx.engine.special_status(SpecialJob::Upgrade), JobStatus::Pending);
}

#[test]
fn upgrade_refused_while_queued() {
    let mut ctx = setup();
    assert!(ctx.engine.queue_special(SpecialJob::Upgrade));
    assert!(!ctx.engine.queue_special(SpecialJob::Upgrade));

    assert_eq!(ctx.engine.queue_status(), vec![upgrade()]);
    assert!(ctx.audit().contains("[upgrade] skipping - already queued"));
}

#[test]
fn reset_refused_while_build_active() {
    let mut ctx = setup();
    ctx.submit(b"A");
    ctx.engine.advance();

    assert!(!ctx.engine.queue_special(SpecialJob::Reset));
    assert!(ctx.engine.queue_status().is_empty());
    assert!(ctx.audit().contains("[reset] skipping - already running"));
}

#[test]
fn same_special_job_may_queue_behind_itself() {
    let mut ctx = setup();
    ctx.engine.queue_special(SpecialJob::Upgrade);
    ctx.engine.advance();
    assert_eq!(ctx.engine.special_status(SpecialJob::Upgrade), JobStatus::Running);

    assert!(ctx.engine.queue_special(SpecialJob::Upgrade));
    assert!(!ctx.engine.queue_special(SpecialJob::Reset));
}

#[test]
fn special_job_jumps_the_queue() {
    let mut ctx = setup();
    let a = ctx.submit(b"A");
    let b = ctx.submit(b"B");

    ctx.engine.queue_special(SpecialJob::Upgrade);

    assert_eq!(ctx.engine.queue_status(), vec![upgrade(), job(&a), job(&b)]);
    assert_eq!(ctx.engine.advance().started, Some(upgrade()));
}

#[test]
fn upgrade_runs_without_log() {
    let mut ctx = setup();
    ctx.engine.queue_special(SpecialJob::Upgrade);
    ctx.engine.advance();

    let launches = ctx.supervisor.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].log, None);
    assert_eq!(ctx.engine.job_statuses(&upgrade()), vec![JobStatus::Running]);
}

#[test]
fn failed_upgrade_writes_no_info() {
    let mut ctx = setup();
    ctx.engine.queue_special(SpecialJob::Upgrade);
    ctx.engine.advance();

    let tick = ctx.finish_active(2);

    assert_eq!(tick.finished, vec![(upgrade(), 2)]);
    assert!(std::fs::read_dir(ctx.engine.store().layout().info()).unwrap().next().is_none());
    assert!(ctx.audit().contains("[upgrade] complete with code 2"));
}

#[test]
fn reset_clears_store_and_queue() {
    let mut ctx = setup();
    let a = ctx.engine.submit("a.tar.gz", b"A", false).unwrap();
    let b = ctx.submit(b"B");
    ctx.engine.queue_special(SpecialJob::Reset);

    let tick = ctx.engine.advance();

    assert_eq!(tick.started, Some(reset()));
    assert_eq!(tick.finished, vec![(reset(), 0)]);
    assert!(ctx.engine.queue_status().is_empty());
    assert_eq!(ctx.engine.active_job(), None);
    assert_eq!(ctx.engine.status(&a), JobStatus::Unknown);
    assert_eq!(ctx.engine.status(&b), JobStatus::Unknown);
    assert_eq!(ctx.engine.store().filename(&a).unwrap(), None);
    for dir in ctx.engine.store().layout().managed_dirs() {
        assert!(dir.is_dir(), "{} should be recreated", dir.display());
    }
    assert!(ctx.audit().contains("[reset] reset"));
}

#[test]
fn reset_with_bootstrap_occupies_active_slot() {
    let mut toolchain = ScriptToolchain::succeeding();
    toolchain.bootstrap = Some("true".to_string());
    let mut ctx = setup_with(toolchain);
    ctx.engine.queue_special(SpecialJob::Reset);

    let tick = ctx.engine.advance();

    assert!(tick.finished.is_empty());
    assert_eq!(ctx.engine.active_job(), Some(&reset()));
    assert_eq!(ctx.engine.special_status(SpecialJob::Reset), JobStatus::Running);
    assert_eq!(ctx.supervisor.launches()[0].log, None);

    let tick = ctx.finish_active(0);
    assert_eq!(tick.finished, vec![(reset(), 0)]);
    assert_eq!(ctx.engine.special_status(SpecialJob::Reset), JobStatus::Unknown);
}
