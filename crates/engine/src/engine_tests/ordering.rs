// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue progression order tests

use super::*;

#[test]
fn jobs_start_in_submission_order() {
    let mut ctx = setup();
    let a = ctx.submit(b"A");
    let b = ctx.submit(b"B");
    let c = ctx.submit(b"C");
    assert_eq!(ctx.engine.queue_status(), vec![job(&a), job(&b), job(&c)]);

    let mut started = Vec::new();
    started.extend(ctx.engine.advance().started);
    for _ in 0..3 {
        started.extend(ctx.finish_active(0).started);
    }

    assert_eq!(started, vec![job(&a), job(&b), job(&c)]);
    assert_eq!(ctx.engine.active_job(), None);
}

#[test]
fn advance_does_not_start_while_active() {
    let mut ctx = setup();
    let a = ctx.submit(b"A");
    let b = ctx.submit(b"B");

    assert_eq!(ctx.engine.advance().started, Some(job(&a)));
    for _ in 0..3 {
        assert_eq!(ctx.engine.advance(), Tick::default());
    }
    assert_eq!(ctx.engine.queue_status(), vec![job(&b)]);
    assert_eq!(ctx.supervisor.launches().len(), 1);
}

#[test]
fn finishing_and_starting_share_one_tick() {
    let mut ctx = setup();
    let a = ctx.submit(b"A");
    let b = ctx.submit(b"B");
    ctx.engine.advance();

    let tick = ctx.finish_active(0);

    assert_eq!(tick.finished, vec![(job(&a), 0)]);
    assert_eq!(tick.started, Some(job(&b)));
}

#[test]
fn status_moves_forward_through_states() {
    let mut ctx = setup();
    let id = ctx.submit(b"A");
    assert_eq!(ctx.engine.status(&id), JobStatus::Pending);

    ctx.engine.advance();
    assert_eq!(ctx.engine.status(&id), JobStatus::Running);
    assert_eq!(ctx.engine.info(&id).unwrap(), InfoLookup::InProgress(JobStatus::Running));

    std::fs::write(ctx.engine.store().layout().binary_path(&id), b"bin").unwrap();
    ctx.finish_active(0);
    assert_eq!(ctx.engine.status(&id), JobStatus::Complete);
}

#[test]
fn build_launch_gets_log_path_and_arguments() {
    let mut ctx = setup();
    let id = ctx.submit(b"A");
    ctx.engine.advance();

    let launches = ctx.supervisor.launches();
    let layout = ctx.engine.store().layout();
    assert_eq!(launches[0].log, Some(layout.log_path(&job(&id))));
    assert!(launches[0].command.args.contains(&id.to_string()));
    assert!(launches[0].command.args.contains(&layout.source().to_string_lossy().into_owned()));
}

#[test]
fn spawn_failure_finalizes_immediately() {
    let mut ctx = setup();
    let a = ctx.submit(b"A");
    let b = ctx.submit(b"B");
    ctx.supervisor.refuse_spawn(true);

    let tick = ctx.engine.advance();

    assert_eq!(tick.finished, vec![(job(&a), -1)]);
    assert_eq!(ctx.engine.active_job(), None);
    assert_eq!(ctx.engine.status(&a), JobStatus::Error);
    assert_eq!(ctx.engine.queue_status(), vec![job(&b)]);

    ctx.supervisor.refuse_spawn(false);
    assert_eq!(ctx.engine.advance().started, Some(job(&b)));
}

#[test]
fn audit_trail_records_transitions() {
    let mut ctx = setup();
    let id = ctx.submit(b"A");
    ctx.engine.advance();
    ctx.finish_active(3);

    let audit = ctx.audit();
    let tag = format!("[{}]", id.short(16));
    let lines: Vec<&str> = audit.lines().filter(|line| line.contains(&tag)).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("queuing"));
    assert!(lines[1].ends_with("starting"));
    assert!(lines[2].ends_with("complete with code 3"));
}
