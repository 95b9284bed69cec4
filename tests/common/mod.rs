#![allow(dead_code)]

use std::sync::Arc;

use atrium::router::init_router;
use atrium::state::{AppState, Collaborators};
use atrium_auth::ManualClock;
use atrium_config::AppConfig;
use atrium_db::MemoryStore;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cret-pass";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: ManualClock,
}

pub fn start_clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
}

/// In-memory app with a manual clock and no remote collaborators.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(AppConfig::default(), Collaborators::default())
}

pub fn setup_test_app_with(config: AppConfig, collaborators: Collaborators) -> TestApp {
    let clock = start_clock();
    let collaborators = Collaborators {
        clock: Arc::new(clock.clone()),
        ..collaborators
    };
    let state = AppState::new(Arc::new(MemoryStore::new()), &config, collaborators).unwrap();

    TestApp {
        router: init_router(state.clone()),
        state,
        clock,
    }
}

/// Sends one request and returns the status with the body parsed as JSON
/// (or as a JSON string when it is not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, body)
}

pub async fn create_organization(app: &Router, tenant_id: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/organizations",
        None,
        Some(json!({
            "tenant_id": tenant_id,
            "domain": format!("{}.test", tenant_id),
            "description": format!("{} organization", tenant_id),
            "email": format!("ops@{}.test", tenant_id),
            "detail": {}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create organization: {body}");
    body
}

pub async fn create_user(
    app: &Router,
    token: Option<&str>,
    tenant_id: &str,
    dni: &str,
    role: &str,
) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/users",
        token,
        Some(json!({
            "tenant_id": tenant_id,
            "dni": dni,
            "full_name": format!("User {}", dni),
            "password": PASSWORD,
            "role": role
        })),
    )
    .await
}

pub async fn login(app: &Router, tenant_id: &str, dni: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "tenant_id": tenant_id, "dni": dni, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Organization plus its admin; returns the admin token.
pub async fn organization_with_admin(app: &Router, tenant_id: &str) -> String {
    create_organization(app, tenant_id).await;
    let (status, body) = create_user(app, None, tenant_id, "1000", "admin").await;
    assert_eq!(status, StatusCode::OK, "create admin: {body}");
    login(app, tenant_id, "1000").await
}

/// Instructor created by the tenant admin; returns the instructor token.
pub async fn instructor(app: &Router, admin_token: &str, tenant_id: &str, dni: &str) -> String {
    let (status, body) = create_user(app, Some(admin_token), tenant_id, dni, "instructor").await;
    assert_eq!(status, StatusCode::OK, "create instructor: {body}");
    login(app, tenant_id, dni).await
}

/// Posts an envelope to `/invoke/{function}`; the HTTP status must be 200.
pub async fn invoke(app: &Router, function: &str, envelope: Value) -> Value {
    let (status, body) = send(
        app,
        "POST",
        &format!("/invoke/{}", function),
        None,
        Some(envelope),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "invoke {function}: {body}");
    body
}

/// Creates a course taught by the token's instructor and returns its id.
pub async fn course(app: &Router, instructor_token: &str, tenant_id: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/courses",
        Some(instructor_token),
        Some(json!({
            "tenant_id": tenant_id,
            "name": name,
            "description": format!("{} for beginners", name),
            "starts_on": "2026-04-01",
            "ends_on": "2026-06-30",
            "price": 149.9
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create course: {body}");
    body["course_id"].as_str().unwrap().to_string()
}

pub fn schedule_body(tenant_id: &str, course_id: &str, days: &[&str], start: &str, end: &str) -> Value {
    json!({
        "tenant_id": tenant_id,
        "course_id": course_id,
        "days": days,
        "start_time": start,
        "end_time": end
    })
}

/// Adds a schedule to a course and returns its id.
pub async fn schedule(
    app: &Router,
    token: &str,
    tenant_id: &str,
    course_id: &str,
    days: &[&str],
    start: &str,
    end: &str,
) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/schedules",
        Some(token),
        Some(schedule_body(tenant_id, course_id, days, start, end)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create schedule: {body}");
    body["schedule_id"].as_str().unwrap().to_string()
}
