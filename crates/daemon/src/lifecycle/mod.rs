// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration and startup.

mod startup;
pub use startup::{run_bootstrap, startup};

use std::fs::File;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use br_storage::StoreError;
use thiserror::Error;

use crate::http::SharedEngine;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8765;

/// Default period of the background tick driver
pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Store root; every managed directory lives under it
    pub root: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file, when logging to a file
    pub log_path: PathBuf,
    /// Address the HTTP listener binds
    pub addr: SocketAddr,
    /// Period of the background tick driver; `None` ticks only after requests
    pub tick_interval: Option<Duration>,
    /// Toolchain executable
    pub rscript: String,
    /// Host library used while bootstrapping
    pub host_library: Option<String>,
    /// Whether to populate the private library before serving
    pub bootstrap: bool,
}

impl Config {
    /// Configuration rooted at `root` with defaults for everything else.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            lock_path: root.join("buildrd.pid"),
            log_path: root.join("buildrd.log"),
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            tick_interval: Some(DEFAULT_TICK),
            rscript: "Rscript".to_string(),
            host_library: None,
            bootstrap: true,
            root,
        }
    }

    /// Listen on every interface instead of loopback only.
    pub fn exposed(mut self, expose: bool) -> Self {
        let ip = if expose { Ipv4Addr::UNSPECIFIED } else { Ipv4Addr::LOCALHOST };
        self.addr = SocketAddr::from((ip, self.addr.port()));
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    /// Zero disables the background tick driver.
    pub fn tick_every(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval).filter(|d| !d.is_zero());
        self
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Engine shared by the HTTP handlers and the tick driver
    pub engine: SharedEngine,
}

/// Errors that can occur during daemon lifecycle
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Bootstrap failed with exit code {0}")]
    Bootstrap(i32),

    #[error("Failed to run bootstrap command {program}: {source}")]
    BootstrapSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
