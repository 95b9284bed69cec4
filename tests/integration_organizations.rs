mod common;

use axum::http::StatusCode;
use common::{create_organization, create_user, login, organization_with_admin, send, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_create_organization_assigns_sequential_ports() {
    let app = setup_test_app();

    let first = create_organization(&app.router, "acme").await;
    assert_eq!(first["message"], "Organization created successfully");
    assert_eq!(first["tenant_id"], "acme");
    assert_eq!(first["port"], 9200);
    assert_eq!(first["provisioned"], false);

    let second = create_organization(&app.router, "globex").await;
    assert_eq!(second["port"], 9201);
}

#[tokio::test]
async fn test_create_duplicate_organization() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/organizations",
        None,
        Some(json!({
            "tenant_id": "acme",
            "domain": "other.test",
            "description": "again",
            "email": "ops@other.test"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("acme"));
}

#[tokio::test]
async fn test_create_organization_validation() {
    let app = setup_test_app();

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/organizations",
        None,
        Some(json!({ "tenant_id": "acme", "domain": "acme.test", "description": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/organizations",
        None,
        Some(json!({
            "tenant_id": "acme",
            "domain": "acme.test",
            "description": "x",
            "email": "ops@acme.test",
            "detail": "not an object"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "detail must be a JSON object");
}

#[tokio::test]
async fn test_get_and_list_organizations() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;
    create_organization(&app.router, "globex").await;

    let (status, body) = send(&app.router, "GET", "/api/organizations/acme", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenant_id"], "acme");
    assert_eq!(body["domain"], "acme.test");
    assert_eq!(body["port"], 9200);

    let (status, _) = send(&app.router, "GET", "/api/organizations/initech", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app.router, "GET", "/api/organizations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["organizations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_organization_as_admin() {
    let app = setup_test_app();
    let token = organization_with_admin(&app.router, "acme").await;

    let (status, body) = send(
        &app.router,
        "PATCH",
        "/api/organizations/acme",
        Some(&token),
        Some(json!({ "email": "new@acme.test", "domain": "acme.example", "port": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_fields"], json!(["domain", "email"]));

    let (_, body) = send(&app.router, "GET", "/api/organizations/acme", None, None).await;
    assert_eq!(body["email"], "new@acme.test");
    assert_eq!(body["domain"], "acme.example");
    assert_eq!(body["port"], 9200);
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_update_organization_requires_admin() {
    let app = setup_test_app();
    organization_with_admin(&app.router, "acme").await;
    create_user(&app.router, None, "acme", "3001", "client").await;
    let client_token = login(&app.router, "acme", "3001").await;

    let (status, _) = send(
        &app.router,
        "PATCH",
        "/api/organizations/acme",
        None,
        Some(json!({ "email": "x@acme.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app.router,
        "PATCH",
        "/api/organizations/acme",
        Some(&client_token),
        Some(json!({ "email": "x@acme.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied. Required role: admin");
}

#[tokio::test]
async fn test_update_organization_with_nothing_to_change() {
    let app = setup_test_app();
    let token = organization_with_admin(&app.router, "acme").await;

    let (status, _) = send(
        &app.router,
        "PATCH",
        "/api/organizations/acme",
        Some(&token),
        Some(json!({ "tenant_id": "other", "port": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_token_cannot_update_another_tenant() {
    let app = setup_test_app();
    let token = organization_with_admin(&app.router, "acme").await;
    create_organization(&app.router, "globex").await;

    let (status, _) = send(
        &app.router,
        "PATCH",
        "/api/organizations/globex",
        Some(&token),
        Some(json!({ "email": "x@globex.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
