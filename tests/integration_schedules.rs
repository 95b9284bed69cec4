mod common;

use axum::http::StatusCode;
use common::{
    course, create_user, instructor, invoke, login, organization_with_admin, schedule,
    schedule_body, send, setup_test_app,
};
use serde_json::json;

#[tokio::test]
async fn test_instructor_adds_schedule_to_own_course() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let tutor = instructor(&app.router, &admin, "acme", "2001").await;
    let course_id = course(&app.router, &tutor, "acme", "Pottery").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/schedules",
        Some(&tutor),
        Some(schedule_body("acme", &course_id, &["wednesday", "monday", "monday"], "09:00", "11:00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["course_id"], course_id.as_str());
    assert_eq!(body["days"], json!(["monday", "wednesday"]));
    assert_eq!(body["start_time"], "09:00");

    let uri = format!(
        "/api/schedules/acme/{}/{}",
        course_id,
        body["schedule_id"].as_str().unwrap()
    );
    let (status, fetched) = send(&app.router, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["end_time"], "11:00");
}

#[tokio::test]
async fn test_schedule_needs_admin_or_course_instructor() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let owner = instructor(&app.router, &admin, "acme", "2001").await;
    let other = instructor(&app.router, &admin, "acme", "2002").await;
    create_user(&app.router, None, "acme", "3001", "client").await;
    let client = login(&app.router, "acme", "3001").await;
    let course_id = course(&app.router, &owner, "acme", "Pottery").await;
    let body = schedule_body("acme", &course_id, &["friday"], "18:00", "20:00");

    for token in [&other, &client] {
        let (status, _) = send(&app.router, "POST", "/api/schedules", Some(token.as_str()), Some(body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = send(&app.router, "POST", "/api/schedules", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let missing = schedule_body("acme", "12345678-1234-1234-1234-123456789abc", &["friday"], "08:00", "09:00");
    let (status, _) = send(&app.router, "POST", "/api/schedules", Some(&owner), Some(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_times_are_validated() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let tutor = instructor(&app.router, &admin, "acme", "2001").await;
    let course_id = course(&app.router, &tutor, "acme", "Pottery").await;

    for (days, start, end) in [
        (vec!["monday"], "11:00", "09:00"),
        (vec!["monday"], "10:00", "10:00"),
        (vec!["monday"], "9am", "11:00"),
        (vec![], "09:00", "11:00"),
    ] {
        let (status, body) = send(
            &app.router,
            "POST",
            "/api/schedules",
            Some(&tutor),
            Some(schedule_body("acme", &course_id, &days, start, end)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{start}-{end}: {body}");
    }

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/schedules",
        Some(&tutor),
        Some(schedule_body("acme", &course_id, &["someday"], "09:00", "11:00")),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_overlapping_schedule_is_a_conflict() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let tutor = instructor(&app.router, &admin, "acme", "2001").await;
    let course_id = course(&app.router, &tutor, "acme", "Pottery").await;
    schedule(&app.router, &tutor, "acme", &course_id, &["monday", "wednesday"], "09:00", "11:00").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/schedules",
        Some(&tutor),
        Some(schedule_body("acme", &course_id, &["wednesday"], "10:00", "12:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("clashes"));

    schedule(&app.router, &tutor, "acme", &course_id, &["tuesday"], "10:00", "12:00").await;
    schedule(&app.router, &tutor, "acme", &course_id, &["monday"], "11:00", "12:00").await;

    // Another course may use the same slot.
    let other_course = course(&app.router, &tutor, "acme", "Weaving").await;
    schedule(&app.router, &tutor, "acme", &other_course, &["monday"], "09:00", "11:00").await;
}

#[tokio::test]
async fn test_update_schedule_ignores_its_own_slot() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let tutor = instructor(&app.router, &admin, "acme", "2001").await;
    let course_id = course(&app.router, &tutor, "acme", "Pottery").await;
    let monday = schedule(&app.router, &tutor, "acme", &course_id, &["monday"], "09:00", "11:00").await;
    let tuesday = schedule(&app.router, &tutor, "acme", &course_id, &["tuesday"], "09:00", "11:00").await;

    let uri = format!("/api/schedules/acme/{}/{}", course_id, monday);
    let (status, body) = send(&app.router, "PATCH", &uri, Some(&tutor), Some(json!({ "end_time": "11:30" }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["schedule"]["end_time"], "11:30");
    assert_eq!(body["schedule"]["start_time"], "09:00");

    let uri = format!("/api/schedules/acme/{}/{}", course_id, tuesday);
    let (status, _) = send(&app.router, "PATCH", &uri, Some(&tutor), Some(json!({ "days": ["monday"] }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app.router, "PATCH", &uri, Some(&tutor), Some(json!({ "start_time": "12:00" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app.router, "PATCH", &uri, Some(&tutor), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_schedules_pages_within_course() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let tutor = instructor(&app.router, &admin, "acme", "2001").await;
    let course_id = course(&app.router, &tutor, "acme", "Pottery").await;
    let other_course = course(&app.router, &tutor, "acme", "Weaving").await;
    for day in ["monday", "tuesday", "wednesday"] {
        schedule(&app.router, &tutor, "acme", &course_id, &[day], "09:00", "10:00").await;
    }
    schedule(&app.router, &tutor, "acme", &other_course, &["friday"], "09:00", "10:00").await;

    let uri = format!("/api/schedules?tenant_id=acme&course_id={}&limit=2", course_id);
    let (status, page) = send(&app.router, "GET", &uri, Some(&tutor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    let cursor = page["last_schedule_id"].as_str().unwrap();

    let (_, rest) = send(
        &app.router,
        "GET",
        &format!("{}&last_schedule_id={}", uri, cursor),
        Some(&tutor),
        None,
    )
    .await;
    assert_eq!(rest["count"], 1);
    assert!(rest.get("last_schedule_id").is_none());
}

#[tokio::test]
async fn test_delete_schedule() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let owner = instructor(&app.router, &admin, "acme", "2001").await;
    let other = instructor(&app.router, &admin, "acme", "2002").await;
    let course_id = course(&app.router, &owner, "acme", "Pottery").await;
    let slot = schedule(&app.router, &owner, "acme", &course_id, &["monday"], "09:00", "10:00").await;
    let uri = format!("/api/schedules/acme/{}/{}", course_id, slot);

    let (status, _) = send(&app.router, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app.router, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Schedule deleted successfully");

    let (status, _) = send(&app.router, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app.router, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_functions_via_invoke() {
    let app = setup_test_app();
    let admin = organization_with_admin(&app.router, "acme").await;
    let tutor = instructor(&app.router, &admin, "acme", "2001").await;
    let course_id = course(&app.router, &tutor, "acme", "Pottery").await;

    let created = invoke(
        &app.router,
        "create-schedule",
        json!({
            "headers": { "Authorization": tutor },
            "body": schedule_body("acme", &course_id, &["thursday"], "17:00", "19:00")
        }),
    )
    .await;
    assert_eq!(created["statusCode"], 200);
    let schedule_id = created["body"]["schedule_id"].as_str().unwrap();

    let listed = invoke(
        &app.router,
        "list-schedules",
        json!({
            "headers": { "Authorization": tutor },
            "queryStringParameters": { "tenant_id": "acme", "course_id": course_id }
        }),
    )
    .await;
    assert_eq!(listed["statusCode"], 200);
    assert_eq!(listed["body"]["schedules"][0]["schedule_id"], schedule_id);

    let missing = invoke(
        &app.router,
        "get-schedule",
        json!({
            "headers": { "Authorization": tutor },
            "queryStringParameters": {
                "tenant_id": "acme",
                "course_id": course_id,
                "schedule_id": "12345678-1234-1234-1234-123456789abc"
            }
        }),
    )
    .await;
    assert_eq!(missing["statusCode"], 404);
}
