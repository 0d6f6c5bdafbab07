use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use lembar::application::ports::CredentialProvider;
use lembar::application::services::{CooldownConfig, QueueEngine};
use lembar::infrastructure::llm::MockTransformer;
use lembar::infrastructure::persistence::{
    MemoryJobRepository, MemoryNoteRepository, MemorySourceRepository,
};
use lembar::presentation::{AppState, create_router};

struct FixedKey;

impl CredentialProvider for FixedKey {
    fn api_key(&self) -> Option<String> {
        Some("test-key".to_string())
    }
}

fn test_router() -> Router {
    let sources = Arc::new(MemorySourceRepository::new());
    let jobs = Arc::new(MemoryJobRepository::new());
    let notes = Arc::new(MemoryNoteRepository::new());

    let engine = Arc::new(QueueEngine::new(
        sources.clone(),
        jobs.clone(),
        notes.clone(),
        Arc::new(MockTransformer),
        Arc::new(FixedKey),
        CooldownConfig::default(),
    ));

    create_router(AppState {
        engine,
        sources,
        jobs,
        notes,
    })
}

fn multipart_upload(filename: &str, mime: &str, content: &str) -> Request<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {mime}\r\n\r\n{content}\r\n--{b}--\r\n",
        b = boundary,
    );
    Request::builder()
        .method("POST")
        .uri("/api/v1/documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = test_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn queue_starts_empty_and_inactive() {
    let response = test_router()
        .oneshot(Request::get("/api/v1/queue").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 0);
    assert_eq!(body["active"], false);
    assert_eq!(body["running"], false);
    assert_eq!(body["cooldown_remaining"], 0);
}

#[tokio::test]
async fn upload_enqueues_a_pending_job() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(multipart_upload("lecture.txt", "text/plain", "hello notes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = json_body(response).await;
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["filename"], "lecture.txt");

    let response = router
        .oneshot(Request::get("/api/v1/queue").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response).await;
    let listed = body["jobs"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["file_name"], "lecture.txt");
    assert_eq!(listed[0]["status"], "PENDING");
    assert_eq!(listed[0]["stage"], 0);
    assert_eq!(listed[0]["label"], "Waiting in queue");
}

#[tokio::test]
async fn unsupported_files_are_skipped_not_enqueued() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(multipart_upload("virus.exe", "application/x-msdownload", "nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = json_body(response).await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 0);
    assert_eq!(body["skipped"].as_array().unwrap().len(), 1);

    let response = router
        .oneshot(Request::get("/api/v1/queue").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let boundary = "test-boundary";
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(format!("--{}--\r\n", boundary)))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn start_and_pause_toggle_the_engine() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/queue/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(Request::get("/api/v1/queue").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(response).await["active"], true);

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/queue/pause")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(Request::get("/api/v1/queue").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(response).await["active"], false);
}

#[tokio::test]
async fn retry_validates_the_job_id() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/jobs/not-a-uuid/retry")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(
            Request::post(format!("/api/v1/jobs/{}/retry", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_note_is_not_found() {
    let response = test_router()
        .oneshot(
            Request::get(format!("/api/v1/notes/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_document_cascades_to_notes_and_jobs() {
    use lembar::application::ports::{JobRepository, NoteRepository, SourceRepository};
    use lembar::domain::{Job, Note, SourceFile};

    let sources = Arc::new(MemorySourceRepository::new());
    let jobs = Arc::new(MemoryJobRepository::new());
    let notes = Arc::new(MemoryNoteRepository::new());

    let source = SourceFile::new(
        "lecture.pdf".to_string(),
        "application/pdf".to_string(),
        b"data".to_vec(),
    );
    sources.save(&source).await.unwrap();
    jobs.create(&Job::new(source.id)).await.unwrap();
    notes
        .upsert(&Note::new(source.id, "content".to_string()))
        .await
        .unwrap();

    let engine = Arc::new(QueueEngine::new(
        sources.clone(),
        jobs.clone(),
        notes.clone(),
        Arc::new(MockTransformer),
        Arc::new(FixedKey),
        CooldownConfig::default(),
    ));
    let router = create_router(AppState {
        engine,
        sources: sources.clone(),
        jobs: jobs.clone(),
        notes: notes.clone(),
    });

    let response = router
        .oneshot(
            Request::delete(format!("/api/v1/documents/{}", source.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(sources.get(source.id).await.unwrap().is_none());
    assert!(jobs.list_all().await.unwrap().is_empty());
    assert!(notes.list_all().await.unwrap().is_empty());
}
