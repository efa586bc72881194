// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finalization: failure records and batch log splitting

use super::*;
use crate::log_split::BATCH_MARKER;

fn batch_of_two(ctx: &mut TestContext) -> (PackageId, PackageId, JobId) {
    let a = ctx.engine.submit("a_1.0.tar.gz", b"a", false).unwrap();
    let b = ctx.engine.submit("b_2.0.tar.gz", b"b", false).unwrap();
    let batch = ctx.engine.submit_batch(vec![a.clone(), b.clone()]).unwrap();
    (a, b, batch)
}

#[test]
fn failure_writes_info_record() {
    let mut ctx = setup();
    let id = ctx.engine.submit("pkg_1.0.tar.gz", b"broken", true).unwrap();
    ctx.engine.advance();
    ctx.finish_active(1);

    let InfoLookup::Found(info) = ctx.engine.info(&id).unwrap() else {
        panic!("expected info record");
    };
    assert_eq!(info.id, id.to_string());
    assert_eq!(info.hash, id.to_string());
    assert_eq!(info.filename_source.as_deref(), Some("pkg_1.0.tar.gz"));
    assert_eq!(ctx.engine.status(&id), JobStatus::Error);
}

#[test]
fn toolchain_info_record_is_kept() {
    let mut ctx = setup();
    let id = ctx.submit(b"broken");
    ctx.engine.advance();
    let record = r#"{"id":"x","hash":"x","error":"compilation failed"}"#;
    std::fs::write(ctx.engine.store().layout().info_path(&id), record).unwrap();
    ctx.finish_active(1);

    let info = ctx.engine.store().info(&id).unwrap().unwrap();
    assert_eq!(info.extra.get("error").and_then(|v| v.as_str()), Some("compilation failed"));
}

#[test]
fn success_writes_no_info() {
    let mut ctx = setup();
    let id = ctx.submit(b"fine");
    ctx.engine.advance();
    std::fs::write(ctx.engine.store().layout().binary_path(&id), b"bin").unwrap();
    ctx.finish_active(0);

    assert!(!ctx.engine.store().has_info(&id));
}

#[test]
fn failed_batch_records_each_member_with_its_own_filename() {
    let mut ctx = setup();
    let (a, b, _) = batch_of_two(&mut ctx);
    ctx.engine.advance();
    ctx.finish_active(1);

    let info_a = ctx.engine.store().info(&a).unwrap().unwrap();
    let info_b = ctx.engine.store().info(&b).unwrap().unwrap();
    assert_eq!(info_a.filename_source.as_deref(), Some("a_1.0.tar.gz"));
    assert_eq!(info_b.filename_source.as_deref(), Some("b_2.0.tar.gz"));
    assert_eq!(info_b.id, b.to_string());
}

#[test]
fn failed_batch_spares_built_members() {
    let mut ctx = setup();
    let (a, b, _) = batch_of_two(&mut ctx);
    ctx.engine.advance();
    std::fs::write(ctx.engine.store().layout().binary_path(&a), b"bin").unwrap();
    ctx.finish_active(1);

    assert_eq!(ctx.engine.status(&a), JobStatus::Complete);
    assert!(!ctx.engine.store().has_info(&a));
    assert_eq!(ctx.engine.status(&b), JobStatus::Error);
}

#[test]
fn batch_log_is_split_per_member() {
    let mut ctx = setup();
    let (a, b, batch) = batch_of_two(&mut ctx);
    ctx.engine.advance();

    let combined = ctx.engine.store().layout().log_path(&batch);
    let log = format!("{BATCH_MARKER}{a}\nbuilt a\n{BATCH_MARKER}{b}\nbuilt b\n");
    std::fs::write(&combined, &log).unwrap();
    ctx.finish_active(0);

    let log_a = ctx.engine.store().log(&job(&a), None).unwrap().unwrap();
    let log_b = ctx.engine.store().log(&job(&b), None).unwrap().unwrap();
    assert_eq!(log_a, format!("{BATCH_MARKER}{a}\nbuilt a\n"));
    assert_eq!(log_b, format!("{BATCH_MARKER}{b}\nbuilt b\n"));
    assert_eq!(format!("{log_a}{log_b}"), log);
    assert_eq!(ctx.engine.store().log(&batch, None).unwrap(), Some(log));
}

#[test]
fn batch_members_report_running_while_active() {
    let mut ctx = setup();
    let (_, _, batch) = batch_of_two(&mut ctx);
    ctx.engine.advance();

    assert_eq!(ctx.engine.active_job(), Some(&batch));
    assert_eq!(ctx.engine.job_statuses(&batch), vec![JobStatus::Running, JobStatus::Running]);
    ctx.submit(b"a");
    assert!(ctx.engine.queue_status().is_empty());
}
