//! Page flows end to end against an in-process mock backend.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use learnhub_client::{Anonymous, ApiClient, ClientConfig, LocalStore};
use learnhub_core::course::{Course, CourseForm};
use learnhub_core::practice::{JoinFailure, JOIN_FAILURE_MESSAGES};
use learnhub_query::{NotificationLevel, QueryState};
use learnhub_views::pages::courses::CourseAdminPage;
use learnhub_views::pages::instructor::InstructorPage;
use learnhub_views::pages::lessons::LessonsPage;
use learnhub_views::pages::practice::{JoinPageView, PracticeJoinPage};
use learnhub_views::{AppContext, Route, ViewError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn context_with_timeout(base: String, join_timeout: Duration) -> AppContext {
    let config = ClientConfig {
        api_url: base.clone(),
        join_timeout,
        ..ClientConfig::default()
    };
    let api = Arc::new(ApiClient::with_client(
        reqwest::Client::new(),
        base,
        Arc::new(Anonymous),
    ));
    AppContext::from_parts(config, api, Arc::new(LocalStore::in_memory()))
}

fn context(base: String) -> AppContext {
    context_with_timeout(base, Duration::from_secs(10))
}

/// Counts every request that reaches the backend.
#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

async fn count_hit(State(hits): State<Hits>) -> StatusCode {
    hits.0.fetch_add(1, Ordering::SeqCst);
    StatusCode::INTERNAL_SERVER_ERROR
}

// ---------------------------------------------------------------------------
// Practice join
// ---------------------------------------------------------------------------

fn link_body() -> Value {
    json!({
        "code": "abc123",
        "title": "Ownership drills",
        "description": "Ten quick questions on borrowing",
        "course_title": "Rust 101",
        "instructor_name": "Dr. Ferris",
        "question_count": 10,
        "time_limit_minutes": 30,
    })
}

#[tokio::test]
async fn valid_link_shows_backend_metadata() {
    async fn link(Path(code): Path<String>) -> Json<Value> {
        assert_eq!(code, "abc123");
        Json(link_body())
    }

    let base = spawn_backend(Router::new().route("/api/practice/link/{code}", get(link))).await;
    let ctx = context(base);
    let page = PracticeJoinPage::new(&ctx, "abc123");

    let view = page.load().await;
    let JoinPageView::Ready(info) = &view else {
        panic!("expected link info, got {view:?}");
    };
    assert_eq!(info.title, "Ownership drills");
    assert_eq!(info.description.as_deref(), Some("Ten quick questions on borrowing"));
    assert_eq!(info.course_title.as_deref(), Some("Rust 101"));
    assert_eq!(info.instructor_name.as_deref(), Some("Dr. Ferris"));
    assert_eq!(info.question_count, Some(10));
    assert_eq!(info.time_limit_minutes, Some(30));
}

#[tokio::test]
async fn expired_and_unknown_links_show_fixed_messages() {
    async fn link(Path(code): Path<String>) -> (StatusCode, Json<Value>) {
        match code.as_str() {
            "expired1" => (
                StatusCode::GONE,
                Json(json!({ "detail": "Link expired at 2024-01-01", "code": "LINK_EXPIRED" })),
            ),
            "inactive1" => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "LINK_INACTIVE", "code": "LINK_INACTIVE" })),
            ),
            _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "LINK_NOT_FOUND" }))),
        }
    }

    let base = spawn_backend(Router::new().route("/api/practice/link/{code}", get(link))).await;
    let ctx = context(base);

    let cases = [
        ("expired1", JoinFailure::Expired, "This practice link has expired."),
        ("inactive1", JoinFailure::Inactive, "This practice link is no longer active."),
        ("missing1", JoinFailure::NotFound, "This practice link does not exist."),
    ];
    for (code, failure, message) in cases {
        let view = PracticeJoinPage::new(&ctx, code).load().await;
        assert_eq!(view, JoinPageView::Unavailable(failure), "code {code}");
        assert_eq!(view.message(), Some(message));
        assert!(JOIN_FAILURE_MESSAGES.contains(&message));
    }
}

#[tokio::test]
async fn malformed_code_never_reaches_backend() {
    let hits = Hits::default();
    let base = spawn_backend(Router::new().fallback(count_hit).with_state(hits.clone())).await;
    let ctx = context(base);

    let view = PracticeJoinPage::new(&ctx, "no spaces!").load().await;
    assert_eq!(view, JoinPageView::Unavailable(JoinFailure::NotFound));
    assert_eq!(hits.count(), 0);
}

#[tokio::test]
async fn join_stores_session_and_navigates() {
    async fn join(Path(code): Path<String>, Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(code, "abc123");
        assert_eq!(body, json!({ "name": "Test Student" }));
        Json(json!({ "session_id": "sess-9", "session_token": "tok-9", "participant_id": 4 }))
    }

    let base =
        spawn_backend(Router::new().route("/api/practice/link/{code}/join", post(join))).await;
    let ctx = context(base);
    let page = PracticeJoinPage::new(&ctx, "abc123");
    assert!(page.resume().await.is_none());

    let route = page.join("  Test Student ").await.unwrap();
    assert_eq!(route.path(), "/practice/session/sess-9");

    let saved = ctx.store.guest_session().await.unwrap();
    assert_eq!(saved.session_token, "tok-9");
    assert_eq!(saved.display_name.as_deref(), Some("Test Student"));

    assert_eq!(
        page.resume().await,
        Some(Route::PracticeSession {
            session_id: "sess-9".into()
        })
    );
    assert_eq!(page.remembered_name().await.as_deref(), Some("Test Student"));
}

#[tokio::test]
async fn full_session_maps_to_fixed_message() {
    async fn join() -> (StatusCode, Json<Value>) {
        (StatusCode::CONFLICT, Json(json!({ "detail": "LINK_FULL", "code": "LINK_FULL" })))
    }

    let base =
        spawn_backend(Router::new().route("/api/practice/link/{code}/join", post(join))).await;
    let ctx = context(base);
    let mut toasts = ctx.notifications.subscribe();

    let err = PracticeJoinPage::new(&ctx, "abc123")
        .join("Test Student")
        .await
        .unwrap_err();
    assert_matches!(err, ViewError::Join(JoinFailure::Full));

    let toast = toasts.recv().await.unwrap();
    assert_eq!(toast.level, NotificationLevel::Error);
    assert_eq!(toast.message, "This practice session is full.");
    assert!(ctx.store.guest_session().await.is_none());
}

#[tokio::test]
async fn slow_join_times_out_without_saving() {
    async fn join() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Json(json!({ "session_id": "late", "session_token": "late" }))
    }

    let base =
        spawn_backend(Router::new().route("/api/practice/link/{code}/join", post(join))).await;
    let ctx = context_with_timeout(base, Duration::from_millis(200));

    let err = PracticeJoinPage::new(&ctx, "abc123")
        .join("Test Student")
        .await
        .unwrap_err();
    assert_matches!(err, ViewError::Timeout(_));
    assert!(ctx.store.guest_session().await.is_none());
}

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_required_fields_issue_no_request() {
    let hits = Hits::default();
    let base = spawn_backend(Router::new().fallback(count_hit).with_state(hits.clone())).await;
    let ctx = context(base);

    let err = PracticeJoinPage::new(&ctx, "abc123").join("   ").await.unwrap_err();
    assert_matches!(err, ViewError::Invalid(msg) if msg == "Display name is required");

    let err = InstructorPage::new(&ctx)
        .send_invitations(1, " \n ")
        .await
        .unwrap_err();
    assert_matches!(err, ViewError::Invalid(_));

    let err = CourseAdminPage::new(&ctx)
        .create(CourseForm {
            title: "  ".into(),
            description: None,
            is_published: false,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ViewError::Invalid(msg) if msg == "Course title is required");

    let err = LessonsPage::new(&ctx, 1).create("", 1, None).await.unwrap_err();
    assert_matches!(err, ViewError::Invalid(msg) if msg == "Lesson title is required");

    assert_eq!(hits.count(), 0);
    assert!(ctx.store.guest_session().await.is_none());
}

// ---------------------------------------------------------------------------
// Lists reflect mutations
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Courses {
    rows: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicI64>,
}

async fn list_courses(State(s): State<Courses>) -> Json<Value> {
    Json(Value::Array(s.rows.lock().unwrap().clone()))
}

async fn create_course(State(s): State<Courses>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let id = s.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let row = json!({ "id": id, "title": body["title"], "is_published": body["is_published"] });
    s.rows.lock().unwrap().push(row.clone());
    (StatusCode::CREATED, Json(row))
}

async fn update_course(
    State(s): State<Courses>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut rows = s.rows.lock().unwrap();
    let row = rows
        .iter_mut()
        .find(|r| r["id"] == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(published) = body.get("is_published") {
        row["is_published"] = published.clone();
    }
    Ok(Json(row.clone()))
}

async fn delete_course(State(s): State<Courses>, Path(id): Path<i64>) -> StatusCode {
    s.rows.lock().unwrap().retain(|r| r["id"] != id);
    StatusCode::NO_CONTENT
}

fn courses_router(state: Courses) -> Router {
    Router::new()
        .route("/api/admin/courses", get(list_courses).post(create_course))
        .route("/api/admin/courses/{id}", patch(update_course).delete(delete_course))
        .with_state(state)
}

fn course_count(n: usize) -> impl FnMut(&QueryState<Vec<Course>>) -> bool {
    move |s: &QueryState<Vec<Course>>| s.data.as_ref().is_some_and(|c| c.len() == n)
}

#[tokio::test]
async fn course_list_reflects_mutations_without_refresh() {
    let state = Courses::default();
    let base = spawn_backend(courses_router(state.clone())).await;
    let ctx = context(base);
    let page = CourseAdminPage::new(&ctx);
    let mut toasts = ctx.notifications.subscribe();
    let mut observer = page.observe();
    let wait = Duration::from_secs(5);

    tokio::time::timeout(wait, observer.wait_for(course_count(0)))
        .await
        .unwrap()
        .unwrap();

    let created = page
        .create(CourseForm {
            title: "Rust 101".into(),
            description: None,
            is_published: false,
        })
        .await
        .unwrap();
    assert_eq!(toasts.recv().await.unwrap().message, "Course \"Rust 101\" created");

    let listed = tokio::time::timeout(wait, observer.wait_for(course_count(1)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed.data.unwrap()[0].title, "Rust 101");

    let published = page.set_published(created.id, true).await.unwrap();
    assert!(published.is_published);
    let listed = tokio::time::timeout(
        wait,
        observer.wait_for(|s| {
            s.data
                .as_ref()
                .is_some_and(|c| c.first().is_some_and(|c| c.is_published))
        }),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(listed.data.unwrap()[0].is_published);

    page.delete(created.id).await.unwrap();
    tokio::time::timeout(wait, observer.wait_for(course_count(0)))
        .await
        .unwrap()
        .unwrap();
    assert!(state.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_delete_restores_list_and_notifies() {
    async fn refuse() -> (StatusCode, Json<Value>) {
        (StatusCode::FORBIDDEN, Json(json!({ "detail": "Not allowed" })))
    }

    let state = Courses::default();
    state
        .rows
        .lock()
        .unwrap()
        .push(json!({ "id": 1, "title": "Keep me", "is_published": true }));
    let router = Router::new()
        .route("/api/admin/courses", get(list_courses))
        .route("/api/admin/courses/{id}", delete(refuse))
        .with_state(state);
    let base = spawn_backend(router).await;
    let ctx = context(base);
    let page = CourseAdminPage::new(&ctx);
    let mut toasts = ctx.notifications.subscribe();

    page.load().await;
    let err = page.delete(1).await.unwrap_err();
    assert_matches!(err, ViewError::Api(_));

    let cached = page.courses().state().data.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(
        toasts.recv().await.unwrap().message,
        "Failed to delete course: You don't have permission to do that."
    );
}

#[derive(Clone, Default)]
struct Lessons {
    rows: Arc<Mutex<Vec<Value>>>,
    list_hits: Arc<AtomicUsize>,
    next_id: Arc<AtomicI64>,
}

async fn instructor_lessons(State(s): State<Lessons>, Path(course_id): Path<i64>) -> Json<Value> {
    s.list_hits.fetch_add(1, Ordering::SeqCst);
    let rows = s.rows.lock().unwrap();
    Json(Value::Array(
        rows.iter().filter(|r| r["course_id"] == course_id).cloned().collect(),
    ))
}

async fn create_lesson(State(s): State<Lessons>, Json(body): Json<Value>) -> Json<Value> {
    let id = s.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let row = json!({
        "id": id,
        "course_id": body["course_id"],
        "title": body["title"],
        "order": body["order"],
    });
    s.rows.lock().unwrap().push(row.clone());
    Json(row)
}

async fn delete_lesson(State(s): State<Lessons>, Path(id): Path<i64>) -> StatusCode {
    s.rows.lock().unwrap().retain(|r| r["id"] != id);
    StatusCode::NO_CONTENT
}

#[tokio::test]
async fn admin_lesson_writes_refresh_instructor_lists() {
    let state = Lessons::default();
    let router = Router::new()
        .route("/api/instructor/courses/{id}/lessons", get(instructor_lessons))
        .route("/api/admin/lessons", post(create_lesson))
        .route("/api/admin/lessons/{id}", delete(delete_lesson))
        .with_state(state.clone());
    let base = spawn_backend(router).await;
    let ctx = context(base);

    // Long-lived cache entry: only invalidation can make it refetch.
    let instructor_view = InstructorPage::new(&ctx)
        .lessons(7)
        .stale_time(Duration::from_secs(3600));
    assert!(instructor_view.fetch().await.data.unwrap().is_empty());

    let lesson = LessonsPage::new(&ctx, 7)
        .create("Borrowing", 1, None)
        .await
        .unwrap();

    let listed = instructor_view.fetch().await.data.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Borrowing");
    assert_eq!(state.list_hits.load(Ordering::SeqCst), 2);

    LessonsPage::new(&ctx, 7).delete(lesson.id).await.unwrap();
    assert!(instructor_view.fetch().await.data.unwrap().is_empty());
    assert_eq!(state.list_hits.load(Ordering::SeqCst), 3);
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invitation_batch_summary_is_notified() {
    async fn invite(Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(body["emails"].as_array().unwrap().len(), 5);
        Json(json!({
            "sent": ["a@x.com", "b@x.com", "c@x.com"],
            "already_enrolled": ["d@x.com", "e@x.com"],
        }))
    }

    let base = spawn_backend(
        Router::new().route("/api/instructor/courses/{id}/invitations", post(invite)),
    )
    .await;
    let ctx = context(base);
    let mut toasts = ctx.notifications.subscribe();

    InstructorPage::new(&ctx)
        .send_invitations(3, "a@x.com, b@x.com; c@x.com d@x.com\ne@x.com")
        .await
        .unwrap();

    let toast = toasts.recv().await.unwrap();
    assert_eq!(toast.level, NotificationLevel::Success);
    assert_eq!(toast.message, "3 invitations sent, 2 already enrolled");
}
