use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::presentation::handlers::{
    delete_document_handler, get_note_handler, health_handler, list_notes_handler,
    pause_queue_handler, purge_queue_handler, queue_snapshot_handler, retry_job_handler,
    start_queue_handler, upload_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/documents", post(upload_handler))
        .route("/api/v1/documents/{source_id}", delete(delete_document_handler))
        .route("/api/v1/queue", get(queue_snapshot_handler))
        .route("/api/v1/queue/start", post(start_queue_handler))
        .route("/api/v1/queue/pause", post(pause_queue_handler))
        .route("/api/v1/queue/purge", post(purge_queue_handler))
        .route("/api/v1/jobs/{job_id}/retry", post(retry_job_handler))
        .route("/api/v1/notes", get(list_notes_handler))
        .route("/api/v1/notes/{note_id}", get(get_note_handler))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
