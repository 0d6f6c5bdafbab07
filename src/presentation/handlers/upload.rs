use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::SubmittedFile;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub jobs: Vec<AcceptedJob>,
    pub skipped: Vec<String>,
}

#[derive(Serialize)]
pub struct AcceptedJob {
    pub job_id: String,
    pub filename: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn supported_mime(mime: &str) -> bool {
    matches!(
        mime,
        "application/pdf"
            | "application/vnd.ms-powerpoint"
            | "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    ) || mime.starts_with("text/")
}

/// Accepts one or more documents and enqueues a pipeline job per file.
/// Unsupported types are filtered out here; the queue engine never sees
/// them.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        let filename = field.file_name().unwrap_or("unknown").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if !supported_mime(&mime_type) {
            tracing::warn!(filename = %filename, mime_type = %mime_type, "Skipping unsupported file");
            skipped.push(filename);
            continue;
        }

        let data = match field.bytes().await {
            Ok(d) => d.to_vec(),
            Err(e) => {
                tracing::error!(error = %e, filename = %filename, "Failed to read file bytes");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read file: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        tracing::debug!(filename = %filename, bytes = data.len(), "File received");
        accepted.push(SubmittedFile {
            filename,
            mime_type,
            data,
        });
    }

    if accepted.is_empty() && skipped.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No file uploaded".to_string(),
            }),
        )
            .into_response();
    }

    let filenames: Vec<String> = accepted.iter().map(|f| f.filename.clone()).collect();
    match state.engine.submit(accepted).await {
        Ok(job_ids) => {
            let jobs = job_ids
                .into_iter()
                .zip(filenames)
                .map(|(id, filename)| AcceptedJob {
                    job_id: id.to_string(),
                    filename,
                })
                .collect();
            (StatusCode::ACCEPTED, Json(UploadResponse { jobs, skipped })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to enqueue files");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to enqueue files: {}", e),
                }),
            )
                .into_response()
        }
    }
}
