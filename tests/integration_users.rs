mod common;

use axum::http::StatusCode;
use common::{
    create_organization, create_user, instructor, login, organization_with_admin, send,
    setup_test_app,
};
use atrium_models::{UserRecord, UserRole};
use chrono::Utc;
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_client_without_token() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;

    let (status, body) = create_user(&app.router, None, "acme", "3001", "client").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["tenant_id"], "acme");
    assert_eq!(body["dni"], "3001");
    assert_eq!(body["role"], "client");
}

#[tokio::test]
async fn test_student_is_an_alias_of_client() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;

    let (status, body) = create_user(&app.router, None, "acme", "3001", "student").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "client");
}

#[tokio::test]
async fn test_second_admin_conflicts() {
    let app = setup_test_app();
    organization_with_admin(&app.router, "acme").await;

    let (status, body) = create_user(&app.router, None, "acme", "1001", "admin").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("admin"));
}

#[tokio::test]
async fn test_duplicate_user_conflicts() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;
    create_user(&app.router, None, "acme", "3001", "client").await;

    let (status, _) = create_user(&app.router, None, "acme", "3001", "client").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_failed_admin_insert_frees_the_admin_slot() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;

    // an admin record that never went through the admin slot
    let record = UserRecord {
        tenant_id: "acme".to_string(),
        dni: "1000".to_string(),
        full_name: "Imported Admin".to_string(),
        role: UserRole::Admin,
        password_digest: "x".to_string(),
        detail: None,
        created_at: Utc::now(),
    };
    assert!(app.state.credentials.insert_user(&record).await.unwrap());

    let (status, _) = create_user(&app.router, None, "acme", "1000", "admin").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = create_user(&app.router, None, "acme", "1001", "admin").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_for_unknown_organization() {
    let app = setup_test_app();

    let (status, body) = create_user(&app.router, None, "ghost", "3001", "client").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/users",
        None,
        Some(json!({ "tenant_id": "acme", "dni": "1", "full_name": "X", "password": "p", "role": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/users",
        None,
        Some(json!({ "tenant_id": "acme", "dni": "1", "full_name": "X", "password": "", "role": "client" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/users",
        None,
        Some(json!({
            "tenant_id": "acme", "dni": "1", "full_name": "X", "password": "p",
            "role": "client", "detail": [1, 2]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "detail must be a JSON object");
}

#[tokio::test]
async fn test_instructor_creation_requires_admin_token() {
    let app = setup_test_app();
    let admin_token = organization_with_admin(&app.router, "acme").await;
    create_user(&app.router, None, "acme", "3001", "client").await;
    let client_token = login(&app.router, "acme", "3001").await;

    let (status, _) = create_user(&app.router, None, "acme", "2001", "instructor").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        create_user(&app.router, Some("not-a-token"), "acme", "2001", "instructor").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        create_user(&app.router, Some(&client_token), "acme", "2001", "instructor").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        create_user(&app.router, Some(&admin_token), "acme", "2001", "instructor").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "instructor");
}

#[tokio::test]
async fn test_get_user_hides_password_digest() {
    let app = setup_test_app();
    create_organization(&app.router, "acme").await;
    create_user(&app.router, None, "acme", "3001", "client").await;

    let (status, body) = send(&app.router, "GET", "/api/users/acme/client/3001", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dni"], "3001");
    assert_eq!(body["full_name"], "User 3001");
    assert!(body.get("password_digest").is_none());
    assert!(body.get("password").is_none());

    let (status, _) = send(&app.router, "GET", "/api/users/acme/instructor/3001", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app.router, "GET", "/api/users/acme/owner/3001", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn dnis(body: &Value) -> Vec<String> {
    body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["dni"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_users_pagination_walks_every_page() {
    let app = setup_test_app();
    let token = organization_with_admin(&app.router, "acme").await;
    for dni in ["3004", "3002", "3005", "3001", "3003"] {
        create_user(&app.router, None, "acme", dni, "client").await;
    }

    let (status, page1) = send(
        &app.router,
        "GET",
        "/api/users?tenant_id=acme&role=client&limit=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dnis(&page1), vec!["3001", "3002"]);
    assert_eq!(page1["last_dni"], "3002");

    let (_, page2) = send(
        &app.router,
        "GET",
        "/api/users?tenant_id=acme&role=client&limit=2&last_dni=3002",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(dnis(&page2), vec!["3003", "3004"]);
    assert_eq!(page2["last_dni"], "3004");

    let (_, page3) = send(
        &app.router,
        "GET",
        "/api/users?tenant_id=acme&role=client&limit=2&last_dni=3004",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(dnis(&page3), vec!["3005"]);
    assert!(page3.get("last_dni").is_none());
}

#[tokio::test]
async fn test_list_users_exact_page_has_no_cursor() {
    let app = setup_test_app();
    let token = organization_with_admin(&app.router, "acme").await;
    instructor(&app.router, &token, "acme", "2001").await;
    instructor(&app.router, &token, "acme", "2002").await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/users?tenant_id=acme&role=instructor&limit=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dnis(&body), vec!["2001", "2002"]);
    assert!(body.get("last_dni").is_none());
}

#[tokio::test]
async fn test_list_users_authorization() {
    let app = setup_test_app();
    let token = organization_with_admin(&app.router, "acme").await;
    create_user(&app.router, None, "acme", "3001", "client").await;
    let client_token = login(&app.router, "acme", "3001").await;

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/users?tenant_id=acme&role=client",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/users?tenant_id=acme&role=client",
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/users?tenant_id=acme&role=admin",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app.router, "GET", "/api/users?role=client", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
