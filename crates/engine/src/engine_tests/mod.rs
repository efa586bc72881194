// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::supervisor::FakeSupervisor;
use crate::toolchain::ScriptToolchain;
use tempfile::TempDir;

mod admission;
mod end_to_end;
mod finalize;
mod ordering;
mod special;

struct TestContext {
    dir: TempDir,
    engine: Engine<FakeSupervisor>,
    supervisor: FakeSupervisor,
}

impl TestContext {
    fn submit(&mut self, bytes: &[u8]) -> PackageId {
        self.engine.submit("pkg_1.0.tar.gz", bytes, true).unwrap()
    }

    fn audit(&self) -> String {
        self.engine.store().queue_log(None).unwrap().unwrap_or_default()
    }

    /// Exit the active fake process and advance past it.
    fn finish_active(&mut self, code: i32) -> Tick {
        self.supervisor.exit_latest(code);
        self.engine.advance()
    }
}

fn setup() -> TestContext {
    setup_with(ScriptToolchain::succeeding())
}

fn setup_with(toolchain: ScriptToolchain) -> TestContext {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let supervisor = FakeSupervisor::new();
    let engine = Engine::new(store, toolchain, supervisor.clone());
    TestContext { dir, engine, supervisor }
}

fn job(id: &PackageId) -> JobId {
    JobId::from(id.clone())
}

#[test]
fn new_engine_is_idle() {
    let mut ctx = setup();
    assert!(ctx.engine.queue_status().is_empty());
    assert_eq!(ctx.engine.active_job(), None);
    assert_eq!(ctx.engine.advance(), Tick::default());
    assert!(ctx.audit().contains("buildr starting"));
}

#[test]
fn label_shortens_ids() {
    let a = PackageId::of_bytes(b"a");
    let b = PackageId::of_bytes(b"b");
    assert_eq!(label(&job(&a)), a.short(16));
    assert_eq!(label(&JobId::batch(vec![a.clone(), b]).unwrap()), format!("{}+1", a.short(16)));
    assert_eq!(label(&JobId::from(SpecialJob::Reset)), "reset");
}

#[test]
fn status_of_unknown_package() {
    let ctx = setup();
    let id = PackageId::of_bytes(b"never submitted");
    assert_eq!(ctx.engine.status(&id), JobStatus::Unknown);
    assert_eq!(ctx.engine.info(&id).unwrap(), InfoLookup::NotFound);
}
