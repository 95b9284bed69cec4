use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use atrium_core::{AppError, ValidatedJson, ValidatedQuery};
use atrium_models::{
    Course, CourseId, CourseKey, CourseList, CreateCourseDto, ListCoursesQuery, MessageResponse,
    UpdateCourseDto, UpdateCourseResponse,
};

use super::service::CourseService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::BearerToken;
use crate::state::AppState;

fn course_key(tenant_id: String, course_id: &str) -> Result<CourseKey, AppError> {
    let course_id: CourseId = course_id
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("course_id must be a UUID")))?;
    Ok(CourseKey {
        tenant_id,
        course_id,
    })
}

/// Create a course (instructors only)
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 200, description = "Course created", body = Course),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Not an instructor", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, token, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::create_course(&state, token.as_deref(), dto).await?;
    Ok(Json(course))
}

/// List the courses of a tenant
#[utoipa::path(
    get,
    path = "/api/courses",
    params(ListCoursesQuery),
    responses(
        (status = 200, description = "One page of courses", body = CourseList),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, token))]
pub async fn list_courses(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedQuery(query): ValidatedQuery<ListCoursesQuery>,
) -> Result<Json<CourseList>, AppError> {
    let courses = CourseService::list_courses(&state, token.as_deref(), query).await?;
    Ok(Json(courses))
}

/// Get a course
#[utoipa::path(
    get,
    path = "/api/courses/{tenant_id}/{course_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("course_id" = String, Path, description = "Course id (UUID)")
    ),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, token))]
pub async fn get_course(
    State(state): State<AppState>,
    token: BearerToken,
    Path((tenant_id, course_id)): Path<(String, String)>,
) -> Result<Json<Course>, AppError> {
    let key = course_key(tenant_id, &course_id)?;
    let course = CourseService::get_course(&state, token.as_deref(), key).await?;
    Ok(Json(course))
}

/// Update a course (admin or owning instructor)
#[utoipa::path(
    patch,
    path = "/api/courses/{tenant_id}/{course_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("course_id" = String, Path, description = "Course id (UUID)")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = UpdateCourseResponse),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Neither admin nor owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, token, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    token: BearerToken,
    Path((tenant_id, course_id)): Path<(String, String)>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<UpdateCourseResponse>, AppError> {
    let key = course_key(tenant_id, &course_id)?;
    let response = CourseService::update_course(&state, token.as_deref(), key, dto).await?;
    Ok(Json(response))
}

/// Delete a course (admin or owning instructor)
#[utoipa::path(
    delete,
    path = "/api/courses/{tenant_id}/{course_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("course_id" = String, Path, description = "Course id (UUID)")
    ),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Neither admin nor owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, token))]
pub async fn delete_course(
    State(state): State<AppState>,
    token: BearerToken,
    Path((tenant_id, course_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let key = course_key(tenant_id, &course_id)?;
    let response = CourseService::delete_course(&state, token.as_deref(), key).await?;
    Ok(Json(response))
}
