// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Store root: BUILDR_ROOT, used when `--root` is not given
pub fn root() -> Option<PathBuf> {
    std::env::var("BUILDR_ROOT").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// HTTP port: BUILDR_PORT, used when `--port` is not given
pub fn port() -> Option<u16> {
    std::env::var("BUILDR_PORT").ok().and_then(|s| s.parse::<u16>().ok())
}

/// Periodic tick interval override. Zero disables the periodic driver.
pub fn tick_interval() -> Option<Duration> {
    std::env::var("BUILDR_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Toolchain executable (default `Rscript`)
pub fn rscript() -> String {
    std::env::var("BUILDR_RSCRIPT")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Rscript".to_string())
}

/// Host R library providing the toolchain's own packages during bootstrap.
pub fn host_library() -> Option<String> {
    std::env::var(br_engine::R_LIBS_USER).ok().filter(|s| !s.is_empty())
}
