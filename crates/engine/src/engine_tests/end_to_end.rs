// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds driven through real `sh` subprocesses

use super::*;
use crate::supervisor::ProcessSupervisor;
use br_core::PackageKind;
use std::time::{Duration, Instant};

fn process_engine(toolchain: ScriptToolchain) -> (TempDir, Engine) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let engine = Engine::new(store, toolchain, ProcessSupervisor::new());
    (dir, engine)
}

/// Tick until `done` holds, sleeping between ticks.
fn drive(engine: &mut Engine, done: impl Fn(&Engine) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done(engine) {
        assert!(Instant::now() < deadline, "engine did not settle");
        engine.advance();
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn successful_build_is_downloadable() {
    let (_dir, mut engine) = process_engine(ScriptToolchain::succeeding());
    let id = engine.submit("pkg_1.0.tar.gz", b"package bytes", true).unwrap();

    drive(&mut engine, |e| e.status(&id).is_terminal());

    assert_eq!(engine.status(&id), JobStatus::Complete);
    let binary = engine.store().artifact_file(&id, PackageKind::Binary).unwrap();
    assert_eq!(std::fs::read(binary).unwrap(), b"package bytes");
    let log = engine.store().log(&job(&id), None).unwrap().unwrap();
    assert!(log.contains(id.as_str()));
}

#[test]
fn failed_build_has_info() {
    let (_dir, mut engine) = process_engine(ScriptToolchain::failing());
    let id = engine.submit("pkg_1.0.tar.gz", b"broken bytes", true).unwrap();

    drive(&mut engine, |e| e.status(&id).is_terminal());

    assert_eq!(engine.status(&id), JobStatus::Error);
    let info = engine.store().info(&id).unwrap().unwrap();
    assert_eq!(info.id, id.to_string());
    assert_eq!(info.hash, id.to_string());
    let log = engine.store().log(&job(&id), Some(1)).unwrap().unwrap();
    assert_eq!(log.trim_end(), format!("building {}", id));
}

#[test]
fn queued_builds_complete_in_order() {
    let (_dir, mut engine) = process_engine(ScriptToolchain::succeeding());
    let ids: Vec<PackageId> = [&b"one"[..], &b"two"[..], &b"three"[..]]
        .iter()
        .map(|bytes| engine.submit("p.tar.gz", bytes, true).unwrap())
        .collect();

    let mut started = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while ids.iter().any(|id| !engine.status(id).is_terminal()) {
        assert!(Instant::now() < deadline, "engine did not settle");
        started.extend(engine.advance().started);
        std::thread::sleep(Duration::from_millis(10));
    }

    let expected: Vec<JobId> = ids.iter().map(job).collect();
    assert_eq!(started, expected);
    assert!(ids.iter().all(|id| engine.status(id) == JobStatus::Complete));
}

#[test]
fn batch_build_splits_logs() {
    let (_dir, mut engine) = process_engine(ScriptToolchain::succeeding());
    let a = engine.submit("a.tar.gz", b"a", false).unwrap();
    let b = engine.submit("b.tar.gz", b"b", false).unwrap();
    engine.submit_batch(vec![a.clone(), b.clone()]).unwrap();

    drive(&mut engine, |e| e.status(&a).is_terminal() && e.status(&b).is_terminal());
    drive(&mut engine, |e| e.active_job().is_none());

    assert_eq!(engine.status(&a), JobStatus::Complete);
    assert_eq!(engine.status(&b), JobStatus::Complete);
    let log_b = engine.store().log(&job(&b), None).unwrap().unwrap();
    assert!(log_b.starts_with(&format!("*** buildr: {}", b)));
    assert!(!log_b.contains(a.as_str()));
}
