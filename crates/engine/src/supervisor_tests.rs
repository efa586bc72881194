// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh").arg("-c").arg(script)
}

fn wait(supervisor: &mut ProcessSupervisor, child: &mut Child) -> i32 {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(code) = supervisor.poll(child).unwrap() {
            return code;
        }
        assert!(Instant::now() < deadline, "process did not finish");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn output_goes_to_log_file() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("build.log");
    let mut supervisor = ProcessSupervisor::new();

    let mut launched =
        supervisor.launch(&sh("echo out; echo err >&2"), Some(&log)).unwrap();
    assert_eq!(wait(&mut supervisor, &mut launched.handle), 0);
    drop(launched.log);

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.contains("out\n"));
    assert!(content.contains("err\n"));
}

#[test]
fn log_is_truncated_on_launch() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("build.log");
    std::fs::write(&log, "stale output\n").unwrap();
    let mut supervisor = ProcessSupervisor::new();

    let mut launched = supervisor.launch(&sh("echo fresh"), Some(&log)).unwrap();
    wait(&mut supervisor, &mut launched.handle);
    drop(launched.log);

    assert_eq!(std::fs::read_to_string(&log).unwrap(), "fresh\n");
}

#[test]
fn exit_code_is_reported() {
    let mut supervisor = ProcessSupervisor::new();
    let mut launched = supervisor.launch(&sh("exit 3"), None).unwrap();
    assert!(launched.log.is_none());
    assert_eq!(wait(&mut supervisor, &mut launched.handle), 3);
}

#[test]
fn poll_does_not_block_while_running() {
    let mut supervisor = ProcessSupervisor::new();
    let mut launched = supervisor.launch(&sh("sleep 5"), None).unwrap();

    let start = Instant::now();
    assert_eq!(supervisor.poll(&mut launched.handle).unwrap(), None);
    assert!(start.elapsed() < Duration::from_secs(1));

    launched.handle.kill().unwrap();
    launched.handle.wait().unwrap();
}

#[test]
fn environment_is_passed() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("env.log");
    let mut supervisor = ProcessSupervisor::new();
    let command = sh("printf %s \"$BUILDR_TEST_VAR\"").env("BUILDR_TEST_VAR", "lib-path");

    let mut launched = supervisor.launch(&command, Some(&log)).unwrap();
    wait(&mut supervisor, &mut launched.handle);
    drop(launched.log);

    assert_eq!(std::fs::read_to_string(&log).unwrap(), "lib-path");
}

#[test]
fn missing_program_is_a_spawn_error() {
    let mut supervisor = ProcessSupervisor::new();
    let result = supervisor.launch(&CommandSpec::new("/nonexistent/buildr-toolchain"), None);
    assert!(matches!(result, Err(SupervisorError::Spawn { .. })));
}

#[test]
fn unopenable_log_is_a_log_error() {
    let dir = TempDir::new().unwrap();
    let mut supervisor = ProcessSupervisor::new();
    let result = supervisor.launch(&sh("true"), Some(&dir.path().join("missing/dir/log")));
    assert!(matches!(result, Err(SupervisorError::Log { .. })));
}

#[test]
fn fake_runs_until_exited() {
    let mut fake = FakeSupervisor::new();
    let mut launched = fake.launch(&sh("anything"), None).unwrap();
    assert_eq!(fake.poll(&mut launched.handle).unwrap(), None);

    fake.exit_latest(1);
    assert_eq!(fake.poll(&mut launched.handle).unwrap(), Some(1));
    assert_eq!(fake.launches().len(), 1);
}
