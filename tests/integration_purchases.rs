mod common;

use axum::Router;
use axum::http::StatusCode;
use common::{
    course, create_user, instructor, invoke, login, organization_with_admin, schedule, send,
    setup_test_app,
};
use serde_json::{Value, json};

struct Catalogue {
    admin: String,
    tutor: String,
    course_id: String,
    schedule_id: String,
}

/// Tenant "acme" with instructor 2001 teaching one course on Monday mornings.
async fn catalogue(app: &Router) -> Catalogue {
    let admin = organization_with_admin(app, "acme").await;
    let tutor = instructor(app, &admin, "acme", "2001").await;
    let course_id = course(app, &tutor, "acme", "Pottery").await;
    let schedule_id = schedule(app, &tutor, "acme", &course_id, &["monday"], "09:00", "11:00").await;
    Catalogue {
        admin,
        tutor,
        course_id,
        schedule_id,
    }
}

async fn client(app: &Router, dni: &str) -> String {
    let (status, body) = create_user(app, None, "acme", dni, "client").await;
    assert_eq!(status, StatusCode::OK, "create client: {body}");
    login(app, "acme", dni).await
}

fn purchase_body(course_id: &str, schedule_id: &str, status: &str) -> Value {
    json!({
        "tenant_id": "acme",
        "course_id": course_id,
        "schedule_id": schedule_id,
        "status": status
    })
}

async fn buy(app: &Router, token: &str, course_id: &str, schedule_id: &str, status: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/purchases",
        Some(token),
        Some(purchase_body(course_id, schedule_id, status)),
    )
    .await
}

#[tokio::test]
async fn test_client_reserves_then_enrolls() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;
    let buyer = client(&app.router, "3001").await;

    let (status, reserved) = buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, "reserved").await;
    assert_eq!(status, StatusCode::OK, "{reserved}");
    assert_eq!(reserved["status"], "reserved");
    assert_eq!(reserved["dni"], "3001");
    assert_eq!(reserved["course_name"], "Pottery");
    assert_eq!(reserved["instructor_name"], "User 2001");
    assert_eq!(reserved["days"], json!(["monday"]));
    assert_eq!(reserved["start_time"], "09:00");

    let (status, body) = buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, "reserved").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Course already reserved");

    let (status, enrolled) = buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, "enrolled").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(enrolled["status"], "enrolled");
    assert_eq!(enrolled["purchased_at"], reserved["purchased_at"]);

    for again in ["enrolled", "reserved"] {
        let (status, body) = buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, again).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Already enrolled in this course");
    }
}

#[tokio::test]
async fn test_status_defaults_to_reserved_and_accepts_aliases() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;
    let buyer = client(&app.router, "3001").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/purchases",
        Some(&buyer),
        Some(json!({
            "tenant_id": "acme",
            "course_id": cat.course_id,
            "schedule_id": cat.schedule_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "reserved");

    let (status, body) = buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, "inscrito").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "enrolled");

    let other = client(&app.router, "3002").await;
    let (status, _) = buy(&app.router, &other, &cat.course_id, &cat.schedule_id, "paid").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_only_clients_purchase() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;

    for token in [&cat.admin, &cat.tutor] {
        let (status, _) = buy(&app.router, token, &cat.course_id, &cat.schedule_id, "reserved").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/purchases",
        None,
        Some(purchase_body(&cat.course_id, &cat.schedule_id, "reserved")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_purchase_needs_course_and_its_schedule() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;
    let buyer = client(&app.router, "3001").await;
    let unknown = "12345678-1234-1234-1234-123456789abc";

    let (status, body) = buy(&app.router, &buyer, unknown, &cat.schedule_id, "reserved").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Course"));

    let (status, body) = buy(&app.router, &buyer, &cat.course_id, unknown, "reserved").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Schedule"));

    // A schedule of another course does not count.
    let weaving = course(&app.router, &cat.tutor, "acme", "Weaving").await;
    let (status, _) = buy(&app.router, &buyer, &weaving, &cat.schedule_id, "reserved").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_purchases_depends_on_role() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;
    let weaving = course(&app.router, &cat.tutor, "acme", "Weaving").await;
    let weaving_slot = schedule(&app.router, &cat.tutor, "acme", &weaving, &["friday"], "18:00", "20:00").await;
    let ana = client(&app.router, "3001").await;
    let bo = client(&app.router, "3002").await;

    buy(&app.router, &ana, &cat.course_id, &cat.schedule_id, "reserved").await;
    buy(&app.router, &ana, &weaving, &weaving_slot, "enrolled").await;
    buy(&app.router, &bo, &cat.course_id, &cat.schedule_id, "enrolled").await;

    let (status, mine) = send(&app.router, "GET", "/api/purchases?tenant_id=acme", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["count"], 2);
    assert!(mine["purchases"].as_array().unwrap().iter().all(|p| p["dni"] == "3001"));

    let (_, enrolled) = send(
        &app.router,
        "GET",
        "/api/purchases?tenant_id=acme&status=enrolled",
        Some(&ana),
        None,
    )
    .await;
    assert_eq!(enrolled["count"], 1);
    assert_eq!(enrolled["purchases"][0]["course_id"], weaving.as_str());

    let (_, first) = send(&app.router, "GET", "/api/purchases?tenant_id=acme&limit=1", Some(&ana), None).await;
    assert_eq!(first["count"], 1);
    let cursor = first["last_key"].as_str().unwrap().to_string();
    let (_, second) = send(
        &app.router,
        "GET",
        &format!("/api/purchases?tenant_id=acme&limit=1&last_key={}", cursor),
        Some(&ana),
        None,
    )
    .await;
    assert_eq!(second["count"], 1);
    assert_ne!(second["purchases"][0]["course_id"], first["purchases"][0]["course_id"]);
    assert!(second.get("last_key").is_none());

    let uri = format!("/api/purchases?tenant_id=acme&course_id={}", cat.course_id);
    let (status, roster) = send(&app.router, "GET", &uri, Some(&cat.tutor), None).await;
    assert_eq!(status, StatusCode::OK);
    let dnis: Vec<_> = roster["purchases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["dni"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dnis, ["3001", "3002"]);

    let (status, _) = send(&app.router, "GET", &uri, Some(&cat.admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let other = instructor(&app.router, &cat.admin, "acme", "2002").await;
    let (status, _) = send(&app.router, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app.router, "GET", "/api/purchases?tenant_id=acme", Some(&cat.tutor), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_copies_course_and_schedule_changes() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;
    let buyer = client(&app.router, "3001").await;
    buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, "reserved").await;

    let course_uri = format!("/api/courses/acme/{}", cat.course_id);
    let (status, _) = send(
        &app.router,
        "PATCH",
        &course_uri,
        Some(&cat.tutor),
        Some(json!({ "name": "Advanced Pottery", "price": 199.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let schedule_uri = format!("/api/schedules/acme/{}/{}", cat.course_id, cat.schedule_id);
    let (status, _) = send(
        &app.router,
        "PATCH",
        &schedule_uri,
        Some(&cat.tutor),
        Some(json!({ "end_time": "12:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, before) = send(&app.router, "GET", "/api/purchases?tenant_id=acme", Some(&buyer), None).await;
    assert_eq!(before["purchases"][0]["course_name"], "Pottery");

    let refresh = json!({ "tenant_id": "acme", "course_id": cat.course_id, "schedule_id": cat.schedule_id });
    let (status, _) = send(&app.router, "PATCH", "/api/purchases", Some(&buyer), Some(refresh.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app.router, "PATCH", "/api/purchases", Some(&cat.tutor), Some(refresh)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["updated"], 1);

    let (_, after) = send(&app.router, "GET", "/api/purchases?tenant_id=acme", Some(&buyer), None).await;
    let purchase = &after["purchases"][0];
    assert_eq!(purchase["course_name"], "Advanced Pottery");
    assert_eq!(purchase["price"], 199.0);
    assert_eq!(purchase["end_time"], "12:00");
    assert!(purchase["updated_at"].is_string());

    let empty = course(&app.router, &cat.tutor, "acme", "Weaving").await;
    let (status, _) = send(
        &app.router,
        "PATCH",
        "/api/purchases",
        Some(&cat.admin),
        Some(json!({ "tenant_id": "acme", "course_id": empty })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_cancels_own_purchase() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;
    let buyer = client(&app.router, "3001").await;
    let uri = format!("/api/purchases/acme/{}", cat.course_id);

    buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, "reserved").await;
    let (status, _) = send(&app.router, "DELETE", &uri, Some(&cat.tutor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app.router, "DELETE", &uri, Some(&buyer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reservation cancelled");

    let (status, _) = send(&app.router, "DELETE", &uri, Some(&buyer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    buy(&app.router, &buyer, &cat.course_id, &cat.schedule_id, "enrolled").await;
    let (_, body) = send(&app.router, "DELETE", &uri, Some(&buyer), None).await;
    assert_eq!(body["message"], "Enrollment cancelled");
}

#[tokio::test]
async fn test_purchase_functions_via_invoke() {
    let app = setup_test_app();
    let cat = catalogue(&app.router).await;
    let buyer = client(&app.router, "3001").await;
    let auth = json!({ "Authorization": format!("Bearer {}", buyer) });

    let created = invoke(
        &app.router,
        "create-purchase",
        json!({
            "headers": auth,
            "body": purchase_body(&cat.course_id, &cat.schedule_id, "reservado")
        }),
    )
    .await;
    assert_eq!(created["statusCode"], 200);
    assert_eq!(created["body"]["status"], "reserved");

    let listed = invoke(
        &app.router,
        "list-purchases",
        json!({ "headers": auth, "query": { "tenant_id": "acme", "status": "reserved" } }),
    )
    .await;
    assert_eq!(listed["body"]["count"], 1);

    let refreshed = invoke(
        &app.router,
        "update-purchases",
        json!({
            "headers": { "Authorization": cat.tutor },
            "body": { "tenant_id": "acme", "course_id": cat.course_id }
        }),
    )
    .await;
    assert_eq!(refreshed["statusCode"], 200);
    assert_eq!(refreshed["body"]["message"], "1 purchases updated");

    let cancelled = invoke(
        &app.router,
        "delete-purchase",
        json!({ "headers": auth, "body": { "tenant_id": "acme", "course_id": cat.course_id } }),
    )
    .await;
    assert_eq!(cancelled["statusCode"], 200);
}
