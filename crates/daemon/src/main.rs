// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! buildrd: the buildr build server

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use br_daemon::lifecycle::{Config, DEFAULT_PORT, DEFAULT_TICK};
use br_daemon::{env, router, spawn_ticker, startup, LifecycleError};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "buildrd", version, about = "Build server for R source packages")]
struct Args {
    /// Store root directory [env: BUILDR_ROOT] [default: .]
    #[arg(long)]
    root: Option<PathBuf>,

    /// HTTP port [env: BUILDR_PORT] [default: 8765]
    #[arg(long)]
    port: Option<u16>,

    /// Listen on all interfaces instead of localhost only
    #[arg(long)]
    expose: bool,

    /// Background tick period in milliseconds, 0 to tick only after requests
    /// [env: BUILDR_TICK_MS] [default: 1000]
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Skip populating the toolchain library at startup
    #[arg(long)]
    no_bootstrap: bool,

    /// Log to <root>/buildrd.log instead of stderr
    #[arg(long)]
    log_file: bool,
}

impl Args {
    fn into_config(self) -> Config {
        let root = self.root.or_else(env::root).unwrap_or_else(|| PathBuf::from("."));
        let tick = self.tick_ms.map(Duration::from_millis).or_else(env::tick_interval);
        Config {
            rscript: env::rscript(),
            host_library: env::host_library(),
            bootstrap: !self.no_bootstrap,
            ..Config::new(root)
        }
        .port(self.port.or_else(env::port).unwrap_or(DEFAULT_PORT))
        .exposed(self.expose)
        .tick_every(tick.unwrap_or(DEFAULT_TICK))
    }
}

fn init_tracing(config: &Config, to_file: bool) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = if to_file {
        let dir = config.log_path.parent().unwrap_or(config.root.as_path());
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
        let file_name = config.log_path.file_name().unwrap_or_default();
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!to_file)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_file = args.log_file;
    let config = args.into_config();
    let _guard = init_tracing(&config, log_file)?;

    info!(root = %config.root.display(), addr = %config.addr, "starting buildrd");
    let daemon = startup(&config).context("startup failed")?;

    if let Some(every) = config.tick_interval {
        spawn_ticker(daemon.engine.clone(), every);
    }

    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.addr, e))?;
    info!(addr = %config.addr, "listening");

    axum::serve(listener, router(daemon.engine.clone()))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await
        .context("server error")?;
    Ok(())
}
