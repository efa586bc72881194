// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route handlers

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use br_core::{
    InfoRecord, JobId, JobStatus, PackageId, PackageKind, SourceInfo, SpecialJob,
    BATCH_SEPARATOR,
};
use br_engine::InfoLookup;
use br_storage::QUEUE_LOG;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{with_engine, ApiError, AppState};

/// Pseudo-id naming the pending queue in `/status`
const QUEUE: &str = "queue";

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    translate: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogQuery {
    n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitQuery {
    build: Option<bool>,
}

pub(crate) async fn index() -> Json<&'static str> {
    Json("This is buildr")
}

pub(crate) async fn packages(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let kind: PackageKind = kind.parse()?;
    let names = with_engine(&state, move |engine| engine.store().list(kind, query.translate))
        .await??;
    Ok(Json(names))
}

/// One status string, an array of them for a comma-joined id, or the
/// pending queue. Ids that name nothing buildr could hold are `UNKNOWN`.
pub(crate) async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    with_engine(&state, move |engine| {
        if id == QUEUE {
            let pending: Vec<String> =
                engine.queue_status().iter().map(JobId::to_string).collect();
            return Json(json!(pending));
        }

        let status_of = |part: &str| match part.parse::<JobId>() {
            Ok(job) => engine.job_statuses(&job).first().copied().unwrap_or(JobStatus::Unknown),
            Err(_) => JobStatus::Unknown,
        };
        if id.contains(BATCH_SEPARATOR) {
            Json(json!(id.split(BATCH_SEPARATOR).map(status_of).collect::<Vec<_>>()))
        } else {
            Json(json!(status_of(id.as_str())))
        }
    })
    .await
}

pub(crate) async fn info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InfoRecord>, ApiError> {
    let id = PackageId::parse(&id)?;
    let lookup = with_engine(&state, {
        let id = id.clone();
        move |engine| engine.info(&id)
    })
    .await??;
    match lookup {
        InfoLookup::Found(record) => Ok(Json(record)),
        InfoLookup::InProgress(status) => Err(ApiError::NotReady { id: id.to_string(), status }),
        InfoLookup::NotFound => Err(ApiError::NotFound(id.to_string())),
    }
}

pub(crate) async fn source_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SourceInfo>, ApiError> {
    let id = PackageId::parse(&id)?;
    let info = with_engine(&state, {
        let id = id.clone();
        move |engine| engine.store().source_info(&id)
    })
    .await??;
    info.map(Json).ok_or_else(|| ApiError::NotFound(id.to_string()))
}

/// Build log as a JSON string, optionally only the last `n` lines.
pub(crate) async fn log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LogQuery>,
) -> Result<Json<String>, ApiError> {
    let text = if id == QUEUE_LOG {
        with_engine(&state, move |engine| engine.store().queue_log(query.n)).await??
    } else {
        let job: JobId = id.parse()?;
        with_engine(&state, move |engine| engine.store().log(&job, query.n)).await??
    };
    text.map(Json).ok_or(ApiError::NotFound(id))
}

pub(crate) async fn download(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let kind: PackageKind = kind.parse()?;
    if !kind.is_downloadable() {
        return Err(ApiError::BadRequest(format!("cannot download {} packages", kind)));
    }
    let id = PackageId::parse(&id)?;

    let path = with_engine(&state, {
        let id = id.clone();
        move |engine| engine.store().artifact_file(&id, kind)
    })
    .await?;
    let path = path.ok_or_else(|| ApiError::NotFound(format!("{}/{}", id, kind)))?;
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("{}/{}", id, kind)));
        }
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response())
}

/// Store an upload and queue it unless `build=false`. Returns the package id.
pub(crate) async fn submit(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<SubmitQuery>,
    body: Bytes,
) -> Result<Json<String>, ApiError> {
    let build = query.build.unwrap_or(true);
    let size = body.len();
    let id = with_engine(&state, {
        let name = name.clone();
        move |engine| engine.submit(&name, &body, build)
    })
    .await??;
    tracing::info!(id = %id, name, build, size, "submission");
    Ok(Json(id.to_string()))
}

/// Queue stored sources as one batch. Returns the queued job id.
pub(crate) async fn batch(
    State(state): State<AppState>,
    Json(ids): Json<Vec<String>>,
) -> Result<Json<String>, ApiError> {
    let ids = ids.iter().map(|id| PackageId::parse(id)).collect::<Result<Vec<_>, _>>()?;
    let job = with_engine(&state, move |engine| engine.submit_batch(ids)).await??;
    Ok(Json(job.to_string()))
}

pub(crate) async fn upgrade(State(state): State<AppState>) -> Result<Json<bool>, ApiError> {
    with_engine(&state, |engine| Json(engine.queue_special(SpecialJob::Upgrade))).await
}

pub(crate) async fn reset(State(state): State<AppState>) -> Result<Json<bool>, ApiError> {
    with_engine(&state, |engine| Json(engine.queue_special(SpecialJob::Reset))).await
}
