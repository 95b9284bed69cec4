use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use atrium_core::{AppError, ValidatedJson, ValidatedQuery};
use atrium_models::{
    CourseId, CreateScheduleDto, ListSchedulesQuery, MessageResponse, Schedule, ScheduleId,
    ScheduleKey, ScheduleList, UpdateScheduleDto, UpdateScheduleResponse,
};

use super::service::ScheduleService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::BearerToken;
use crate::state::AppState;

fn schedule_key(
    tenant_id: String,
    course_id: &str,
    schedule_id: &str,
) -> Result<ScheduleKey, AppError> {
    let course_id: CourseId = course_id
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("course_id must be a UUID")))?;
    let schedule_id: ScheduleId = schedule_id
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("schedule_id must be a UUID")))?;
    Ok(ScheduleKey {
        tenant_id,
        course_id,
        schedule_id,
    })
}

/// Add a weekly time slot to a course (admin or course instructor)
#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = CreateScheduleDto,
    responses(
        (status = 200, description = "Schedule created", body = Schedule),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Neither admin nor course instructor", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Clashes with another schedule of the course", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, token, dto))]
pub async fn create_schedule(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedJson(dto): ValidatedJson<CreateScheduleDto>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = ScheduleService::create_schedule(&state, token.as_deref(), dto).await?;
    Ok(Json(schedule))
}

/// List the schedules of a course
#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ListSchedulesQuery),
    responses(
        (status = 200, description = "One page of schedules", body = ScheduleList),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, token))]
pub async fn list_schedules(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedQuery(query): ValidatedQuery<ListSchedulesQuery>,
) -> Result<Json<ScheduleList>, AppError> {
    let schedules = ScheduleService::list_schedules(&state, token.as_deref(), query).await?;
    Ok(Json(schedules))
}

/// Get a schedule
#[utoipa::path(
    get,
    path = "/api/schedules/{tenant_id}/{course_id}/{schedule_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("course_id" = String, Path, description = "Course id (UUID)"),
        ("schedule_id" = String, Path, description = "Schedule id (UUID)")
    ),
    responses(
        (status = 200, description = "Schedule found", body = Schedule),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, token))]
pub async fn get_schedule(
    State(state): State<AppState>,
    token: BearerToken,
    Path((tenant_id, course_id, schedule_id)): Path<(String, String, String)>,
) -> Result<Json<Schedule>, AppError> {
    let key = schedule_key(tenant_id, &course_id, &schedule_id)?;
    let schedule = ScheduleService::get_schedule(&state, token.as_deref(), key).await?;
    Ok(Json(schedule))
}

/// Update a schedule (admin or course instructor)
#[utoipa::path(
    patch,
    path = "/api/schedules/{tenant_id}/{course_id}/{schedule_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("course_id" = String, Path, description = "Course id (UUID)"),
        ("schedule_id" = String, Path, description = "Schedule id (UUID)")
    ),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Schedule updated", body = UpdateScheduleResponse),
        (status = 400, description = "Nothing to update or bad times", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Neither admin nor course instructor", body = ErrorResponse),
        (status = 404, description = "Course or schedule not found", body = ErrorResponse),
        (status = 409, description = "Clashes with another schedule of the course", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, token, dto))]
pub async fn update_schedule(
    State(state): State<AppState>,
    token: BearerToken,
    Path((tenant_id, course_id, schedule_id)): Path<(String, String, String)>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<Json<UpdateScheduleResponse>, AppError> {
    let key = schedule_key(tenant_id, &course_id, &schedule_id)?;
    let response = ScheduleService::update_schedule(&state, token.as_deref(), key, dto).await?;
    Ok(Json(response))
}

/// Delete a schedule (admin or course instructor)
#[utoipa::path(
    delete,
    path = "/api/schedules/{tenant_id}/{course_id}/{schedule_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("course_id" = String, Path, description = "Course id (UUID)"),
        ("schedule_id" = String, Path, description = "Schedule id (UUID)")
    ),
    responses(
        (status = 200, description = "Schedule deleted", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Neither admin nor course instructor", body = ErrorResponse),
        (status = 404, description = "Course or schedule not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, token))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    token: BearerToken,
    Path((tenant_id, course_id, schedule_id)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let key = schedule_key(tenant_id, &course_id, &schedule_id)?;
    let response = ScheduleService::delete_schedule(&state, token.as_deref(), key).await?;
    Ok(Json(response))
}
