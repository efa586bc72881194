// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Non-blocking supervision of external build processes.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use br_core::CommandSpec;
use thiserror::Error;

/// Errors from launching or polling a process
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to open log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to poll process: {0}")]
    Poll(#[source] std::io::Error),
}

/// A launched process and the log file its output goes to.
///
/// The caller owns the log handle and closes it once the process is done.
pub struct Launched<H> {
    pub handle: H,
    pub log: Option<File>,
}

/// Launches external commands and polls them for completion.
pub trait Supervisor {
    type Handle;

    /// Start `command` with stdout and stderr going to `log` (truncated), or
    /// discarded when `log` is `None`. Returns without waiting.
    fn launch(
        &mut self,
        command: &CommandSpec,
        log: Option<&Path>,
    ) -> Result<Launched<Self::Handle>, SupervisorError>;

    /// Exit code if the process has finished, `None` while it is running.
    /// Never blocks.
    fn poll(&mut self, handle: &mut Self::Handle) -> Result<Option<i32>, SupervisorError>;
}

/// Supervisor backed by OS subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSupervisor;

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self
    }
}

impl Supervisor for ProcessSupervisor {
    type Handle = Child;

    fn launch(
        &mut self,
        command: &CommandSpec,
        log: Option<&Path>,
    ) -> Result<Launched<Child>, SupervisorError> {
        let log_file = log
            .map(|path| {
                File::create(path)
                    .map_err(|source| SupervisorError::Log { path: path.to_path_buf(), source })
            })
            .transpose()?;

        let (stdout, stderr) = match &log_file {
            Some(file) => {
                let clone = |f: &File| {
                    f.try_clone().map_err(|source| SupervisorError::Log {
                        path: log.map(Path::to_path_buf).unwrap_or_default(),
                        source,
                    })
                };
                (Stdio::from(clone(file)?), Stdio::from(clone(file)?))
            }
            None => (Stdio::null(), Stdio::null()),
        };

        let child = Command::new(&command.program)
            .args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|source| SupervisorError::Spawn { program: command.program.clone(), source })?;

        tracing::debug!(pid = child.id(), argv = ?command.argv(), "launched process");
        Ok(Launched { handle: child, log: log_file })
    }

    fn poll(&mut self, child: &mut Child) -> Result<Option<i32>, SupervisorError> {
        let status = child.try_wait().map_err(SupervisorError::Poll)?;
        Ok(status.map(|s| s.code().unwrap_or(-1)))
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Launched, Supervisor, SupervisorError};
    use br_core::CommandSpec;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::fs::File;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded launch
    #[derive(Debug, Clone)]
    pub struct FakeLaunch {
        pub command: CommandSpec,
        pub log: Option<PathBuf>,
    }

    #[derive(Default)]
    struct FakeSupervisorState {
        launches: Vec<FakeLaunch>,
        exits: HashMap<usize, i32>,
        refuse_spawn: bool,
    }

    /// Fake supervisor for testing: processes run until the test exits them.
    #[derive(Clone, Default)]
    pub struct FakeSupervisor {
        inner: Arc<Mutex<FakeSupervisorState>>,
    }

    impl FakeSupervisor {
        pub fn new() -> Self {
            Self::default()
        }

        /// All launches so far, oldest first.
        pub fn launches(&self) -> Vec<FakeLaunch> {
            self.inner.lock().launches.clone()
        }

        /// Make the most recently launched process exit with `code`.
        pub fn exit_latest(&self, code: i32) {
            let mut inner = self.inner.lock();
            if let Some(last) = inner.launches.len().checked_sub(1) {
                inner.exits.insert(last, code);
            }
        }

        /// Make subsequent launches fail to spawn.
        pub fn refuse_spawn(&self, refuse: bool) {
            self.inner.lock().refuse_spawn = refuse;
        }
    }

    impl Supervisor for FakeSupervisor {
        type Handle = usize;

        fn launch(
            &mut self,
            command: &CommandSpec,
            log: Option<&Path>,
        ) -> Result<Launched<usize>, SupervisorError> {
            let mut inner = self.inner.lock();
            if inner.refuse_spawn {
                return Err(SupervisorError::Spawn {
                    program: command.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "refused"),
                });
            }
            let log_file = log
                .map(|path| {
                    File::create(path)
                        .map_err(|source| SupervisorError::Log { path: path.to_path_buf(), source })
                })
                .transpose()?;
            inner
                .launches
                .push(FakeLaunch { command: command.clone(), log: log.map(Path::to_path_buf) });
            Ok(Launched { handle: inner.launches.len() - 1, log: log_file })
        }

        fn poll(&mut self, handle: &mut usize) -> Result<Option<i32>, SupervisorError> {
            Ok(self.inner.lock().exits.get(handle).copied())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLaunch, FakeSupervisor};

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
