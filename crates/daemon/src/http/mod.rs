// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP façade over the engine.
//!
//! Handlers call engine operations under the shared lock and render the
//! results. Engine calls do filesystem work (hashing uploads, removing
//! directories on reset), so they run on the blocking pool via
//! [`with_engine`]. After every response the engine gets one
//! [`Engine::advance`] tick; [`spawn_ticker`] adds a timer-driven tick so
//! the queue keeps moving while no requests arrive.

mod error;
mod routes;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::Router;
use br_engine::Engine;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Engine shared between request handlers and the tick driver
pub type SharedEngine = Arc<Mutex<Engine>>;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: SharedEngine,
}

/// Build the router for all buildr endpoints.
pub fn router(engine: SharedEngine) -> Router {
    let state = AppState { engine };
    Router::new()
        .route("/", get(routes::index))
        .route("/packages/{kind}", get(routes::packages))
        .route("/status/{id}", get(routes::status))
        .route("/info/{id}", get(routes::info))
        .route("/source_info/{id}", get(routes::source_info))
        .route("/log/{id}", get(routes::log))
        .route("/download/{id}/{kind}", get(routes::download))
        .route("/submit/{name}", post(routes::submit))
        .route("/batch", post(routes::batch))
        .route("/upgrade", patch(routes::upgrade))
        .route("/reset", patch(routes::reset))
        .layer(middleware::from_fn_with_state(state.clone(), tick_after_response))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn tick_after_response(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::debug!(%method, path, status = response.status().as_u16(), "request");

    match with_engine(&state, |engine| engine.advance()).await {
        Ok(tick) => {
            if let Some(job) = &tick.started {
                tracing::debug!(job = %job, "started after request");
            }
        }
        Err(e) => tracing::warn!(error = %e, "tick after request failed"),
    }
    response
}

/// Run `f` with the engine locked, on tokio's blocking thread pool.
pub(crate) async fn with_engine<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Engine) -> T + Send + 'static,
    T: Send + 'static,
{
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || f(&mut *engine.lock())).await?;
    Ok(result)
}

/// Advance the engine every `every`, independent of request traffic.
pub fn spawn_ticker(engine: SharedEngine, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let engine = engine.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || engine.lock().advance()).await {
                tracing::warn!(error = %e, "timer tick failed");
            }
        }
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
