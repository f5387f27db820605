//! Integration tests for `ApiClient` against an in-process mock backend.
//!
//! Each test spins up a small axum router on an ephemeral port that
//! mimics the relevant backend endpoints, then drives the real client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use learnhub_client::endpoints::admin::VideoFile;
use learnhub_client::{Anonymous, ApiClient, ApiError, StaticToken};
use learnhub_core::instructor::InvitationBatch;
use learnhub_core::practice::JoinPracticeRequest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serve `router` on `127.0.0.1:0` and return its base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client(base_url: String) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), base_url, Arc::new(Anonymous))
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bearer_token_and_request_id_are_attached() {
    async fn echo(headers: HeaderMap) -> Json<Value> {
        Json(json!({
            "authorization": headers.get("authorization").and_then(|v| v.to_str().ok()),
            "request_id": headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        }))
    }

    let base = spawn_backend(Router::new().route("/api/echo", get(echo))).await;
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        base,
        Arc::new(StaticToken("secret".into())),
    );

    let body: Value = api.get("/echo").await.unwrap();
    assert_eq!(body["authorization"], "Bearer secret");
    assert_eq!(body["request_id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn anonymous_requests_have_no_authorization() {
    async fn echo(headers: HeaderMap) -> Json<Value> {
        Json(json!({ "has_auth": headers.contains_key("authorization") }))
    }

    let base = spawn_backend(Router::new().route("/api/echo", get(echo))).await;
    let body: Value = client(base).get("/echo").await.unwrap();
    assert_eq!(body["has_auth"], false);
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_error_carries_backend_message() {
    async fn missing() -> (StatusCode, Json<Value>) {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Course not found" })),
        )
    }

    let base = spawn_backend(Router::new().route("/api/admin/courses", get(missing))).await;
    let err = client(base).list_courses().await.unwrap_err();

    assert_matches!(
        &err,
        ApiError::Client { status: 404, message, .. } if message == "Course not found"
    );
}

#[tokio::test]
async fn server_error_is_classified() {
    async fn boom() -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    let base = spawn_backend(Router::new().route("/api/gamification/stats", get(boom))).await;
    let err = client(base).gamification_stats().await.unwrap_err();
    assert_matches!(err, ApiError::Server { status: 502, .. });
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}/api"))
        .platform_overview()
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Network(_));
}

#[tokio::test]
async fn mismatched_body_is_a_decode_error() {
    async fn wrong() -> Json<Value> {
        Json(json!({ "unexpected": true }))
    }

    let base = spawn_backend(Router::new().route("/api/gamification/stats", get(wrong))).await;
    let err = client(base).gamification_stats().await.unwrap_err();
    assert_matches!(err, ApiError::Decode(_));
}

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_accepts_no_content() {
    async fn gone(Path(id): Path<i64>) -> StatusCode {
        assert_eq!(id, 7);
        StatusCode::NO_CONTENT
    }

    let base = spawn_backend(Router::new().route("/api/admin/courses/{id}", delete(gone))).await;
    client(base).delete_course(7).await.unwrap();
}

#[tokio::test]
async fn missing_subscription_is_none() {
    async fn none() -> (StatusCode, Json<Value>) {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "No subscription" })))
    }

    let base = spawn_backend(Router::new().route("/api/subscriptions/me", get(none))).await;
    assert_eq!(client(base).my_subscription().await.unwrap(), None);
}

#[tokio::test]
async fn invitation_partial_result_is_decoded() {
    async fn invite(Json(body): Json<Value>) -> Json<Value> {
        let emails = body["emails"].as_array().unwrap();
        assert_eq!(emails.len(), 5);
        Json(json!({
            "sent": ["a@x.com", "b@x.com", "c@x.com"],
            "already_enrolled": ["d@x.com", "e@x.com"],
        }))
    }

    let base = spawn_backend(
        Router::new().route("/api/instructor/courses/{id}/invitations", post(invite)),
    )
    .await;

    let batch = InvitationBatch::parse("a@x.com b@x.com c@x.com d@x.com e@x.com").unwrap();
    let result = client(base).send_invitations(3, &batch).await.unwrap();
    assert_eq!(result.summary(), "3 invitations sent, 2 already enrolled");
}

#[tokio::test]
async fn practice_join_posts_display_name() {
    async fn join(Path(code): Path<String>, Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(code, "abc123");
        assert_eq!(body, json!({ "name": "Test Student" }));
        Json(json!({ "session_id": "sess-9", "session_token": "tok-9" }))
    }

    let base =
        spawn_backend(Router::new().route("/api/practice/link/{code}/join", post(join))).await;

    let request = JoinPracticeRequest::from_input("Test Student").unwrap();
    let joined = client(base)
        .join_practice_link("abc123", &request)
        .await
        .unwrap();
    assert_eq!(joined.session_token, "tok-9");
    assert_eq!(joined.session_id, "sess-9");
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct UploadState {
    hits: Arc<AtomicUsize>,
}

async fn receive_upload(State(state): State<UploadState>, mut multipart: Multipart) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let field = multipart.next_field().await.unwrap().unwrap();
    let name = field.name().unwrap().to_string();
    let content_type = field.content_type().unwrap().to_string();
    let file_name = field.file_name().unwrap().to_string();
    let bytes = field.bytes().await.unwrap();
    assert_eq!(name, "file");
    assert_eq!(content_type, "video/mp4");
    Json(json!({
        "video_url": format!("https://cdn.example.com/{file_name}"),
        "duration_secs": bytes.len(),
    }))
}

fn upload_router(state: UploadState) -> Router {
    Router::new()
        .route("/api/admin/videos/upload", post(receive_upload))
        .with_state(state)
}

#[tokio::test]
async fn valid_video_is_uploaded_as_multipart() {
    let state = UploadState::default();
    let base = spawn_backend(upload_router(state.clone())).await;

    let uploaded = client(base)
        .upload_video(VideoFile {
            file_name: "intro.mp4".into(),
            content_type: None,
            bytes: vec![0u8; 16],
        })
        .await
        .unwrap();

    assert_eq!(uploaded.video_url, "https://cdn.example.com/intro.mp4");
    assert_eq!(uploaded.duration_secs, Some(16));
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_video_never_reaches_backend() {
    let state = UploadState::default();
    let base = spawn_backend(upload_router(state.clone())).await;
    let api = client(base);

    let err = api
        .upload_video(VideoFile {
            file_name: "slides.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: vec![1, 2, 3],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Validation(_));

    // Size is checked from the byte count alone; a zero-length file is
    // enough to exercise the guard without allocating 500 MB.
    let err = api
        .upload_video(VideoFile {
            file_name: "empty.mp4".into(),
            content_type: None,
            bytes: Vec::new(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Validation(_));

    assert_eq!(state.hits.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Path segments
// ---------------------------------------------------------------------------

async fn count_hit(State(state): State<UploadState>) -> StatusCode {
    state.hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

#[tokio::test]
async fn malformed_session_id_never_reaches_backend() {
    let state = UploadState::default();
    let base = spawn_backend(Router::new().fallback(count_hit).with_state(state.clone())).await;
    let api = client(base);

    let err = api
        .collaboration_session("../admin/courses")
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::InvalidRequest(_));
    let err = api.leave_collaboration_session("s1/../../x").await.unwrap_err();
    assert_matches!(err, ApiError::InvalidRequest(_));

    assert_eq!(state.hits.load(Ordering::SeqCst), 0);
}
