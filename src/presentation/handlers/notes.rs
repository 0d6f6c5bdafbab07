use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{NoteId, SourceId};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct NoteResponse {
    pub id: String,
    pub source_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct NoteListResponse {
    pub notes: Vec<NoteResponse>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn note_response(note: crate::domain::Note) -> NoteResponse {
    NoteResponse {
        id: note.id.to_string(),
        source_id: note.source_id.to_string(),
        content: note.content,
        created_at: note.created_at.to_rfc3339(),
        updated_at: note.updated_at.to_rfc3339(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_notes_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.notes.list_all().await {
        Ok(notes) => (
            StatusCode::OK,
            Json(NoteListResponse {
                notes: notes.into_iter().map(note_response).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list notes");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list notes: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_note_handler(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&note_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid note ID: {}", note_id),
                }),
            )
                .into_response();
        }
    };

    match state.notes.get_by_id(NoteId::from_uuid(uuid)).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note_response(note))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Note not found: {}", note_id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch note");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch note: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// Deletes one document and everything derived from it: the source
/// bytes, its generated note, and its job records. This is the cascading
/// counterpart to the queue's bulk purge, which touches jobs only.
#[tracing::instrument(skip(state))]
pub async fn delete_document_handler(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&source_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid document ID: {}", source_id),
                }),
            )
                .into_response();
        }
    };
    let id = SourceId::from_uuid(uuid);

    let result = async {
        state.notes.delete_by_source(id).await?;
        state.jobs.delete_by_source(id).await?;
        state.sources.delete(id).await
    }
    .await;

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete document");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to delete document: {}", e),
                }),
            )
                .into_response()
        }
    }
}
