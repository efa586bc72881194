// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use br_engine::{Engine, ProcessSupervisor, RscriptToolchain, Toolchain};
use br_storage::{Layout, Store};
use fs2::FileExt;
use parking_lot::Mutex;
use tracing::info;

use super::{Config, DaemonState, LifecycleError};

/// Start the daemon: lock the root, prepare the store, bootstrap the
/// toolchain, and build the engine.
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create the root (needed for the lock file)
    std::fs::create_dir_all(&config.root)?;

    // 2. Acquire lock file FIRST - prevents two daemons sharing a store.
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Drop mutability

    // 3. Create store directories
    let store = Store::open(&config.root)?;
    info!(root = %config.root.display(), "store ready");

    // 4. Populate the private library (fatal on failure)
    let toolchain = RscriptToolchain::new(&config.rscript, config.host_library.clone());
    if config.bootstrap {
        run_bootstrap(&toolchain, store.layout())?;
    }

    let engine = Engine::new(store, toolchain, ProcessSupervisor::new());
    Ok(DaemonState { config: config.clone(), lock_file, engine: Arc::new(Mutex::new(engine)) })
}

/// Run the toolchain's bootstrap command to completion.
///
/// Blocks; only called before the listener is bound.
pub fn run_bootstrap(toolchain: &dyn Toolchain, layout: &Layout) -> Result<(), LifecycleError> {
    let Some(command) = toolchain.bootstrap(layout) else {
        return Ok(());
    };
    info!(argv = ?command.argv(), "bootstrapping toolchain library");

    let status = Command::new(&command.program)
        .args(&command.args)
        .envs(command.env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .status()
        .map_err(|source| LifecycleError::BootstrapSpawn {
            program: command.program.clone(),
            source,
        })?;

    match status.code() {
        Some(0) => {
            info!("bootstrap complete");
            Ok(())
        }
        code => Err(LifecycleError::Bootstrap(code.unwrap_or(-1))),
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
