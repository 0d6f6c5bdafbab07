use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::{EngineError, status_projection};
use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct QueueResponse {
    pub jobs: Vec<JobRow>,
    pub running: bool,
    pub active: bool,
    pub cooldown_remaining: u32,
    pub cooldown_badge: bool,
}

#[derive(Serialize)]
pub struct JobRow {
    pub id: String,
    pub file_name: String,
    pub status: String,
    pub stage: u8,
    pub label: String,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn queue_snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.engine.snapshot().await;

    let jobs = snapshot
        .jobs
        .into_iter()
        .map(|j| JobRow {
            id: j.id.to_string(),
            file_name: j.file_name,
            status: j.status.as_str().to_string(),
            stage: j.stage.as_u8(),
            label: status_projection::status_label(j.status, j.stage),
            error: j.error,
        })
        .collect();

    (
        StatusCode::OK,
        Json(QueueResponse {
            jobs,
            running: snapshot.running,
            active: snapshot.active,
            cooldown_remaining: snapshot.cooldown_remaining,
            cooldown_badge: status_projection::shows_cooldown(
                snapshot.running,
                snapshot.cooldown_remaining,
            ),
        }),
    )
}

pub async fn start_queue_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.engine.start();
    StatusCode::NO_CONTENT
}

pub async fn pause_queue_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.engine.pause();
    StatusCode::NO_CONTENT
}

#[tracing::instrument(skip(state))]
pub async fn purge_queue_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.purge_finished().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to purge finished jobs");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to purge: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn retry_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    match state.engine.retry(JobId::from_uuid(uuid)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(EngineError::UnknownJob(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {}", job_id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to retry job");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to retry: {}", e),
                }),
            )
                .into_response()
        }
    }
}
