use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use atrium_core::{AppError, ValidatedJson, ValidatedQuery};
use atrium_models::{
    CourseId, CreatePurchaseDto, ListPurchasesQuery, MessageResponse, Purchase, PurchaseKey,
    PurchaseList, RefreshPurchasesDto, RefreshPurchasesResponse,
};

use super::service::PurchaseService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::BearerToken;
use crate::state::AppState;

/// Reserve or enroll in a course schedule (clients only)
#[utoipa::path(
    post,
    path = "/api/purchases",
    request_body = CreatePurchaseDto,
    responses(
        (status = 200, description = "Purchase recorded", body = Purchase),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Not a client", body = ErrorResponse),
        (status = 404, description = "Course or schedule not found", body = ErrorResponse),
        (status = 409, description = "Already reserved or enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
#[instrument(skip(state, token, dto))]
pub async fn create_purchase(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedJson(dto): ValidatedJson<CreatePurchaseDto>,
) -> Result<Json<Purchase>, AppError> {
    let purchase = PurchaseService::create_purchase(&state, token.as_deref(), dto).await?;
    Ok(Json(purchase))
}

/// List purchases: a client's own, or one course's for admins and its instructor
#[utoipa::path(
    get,
    path = "/api/purchases",
    params(ListPurchasesQuery),
    responses(
        (status = 200, description = "One page of purchases", body = PurchaseList),
        (status = 400, description = "course_id missing for staff", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Instructor of another course", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
#[instrument(skip(state, token))]
pub async fn list_purchases(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedQuery(query): ValidatedQuery<ListPurchasesQuery>,
) -> Result<Json<PurchaseList>, AppError> {
    let purchases = PurchaseService::list_purchases(&state, token.as_deref(), query).await?;
    Ok(Json(purchases))
}

/// Copy the current course and schedule details into its purchases
#[utoipa::path(
    patch,
    path = "/api/purchases",
    request_body = RefreshPurchasesDto,
    responses(
        (status = 200, description = "Purchases updated", body = RefreshPurchasesResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Neither admin nor course instructor", body = ErrorResponse),
        (status = 404, description = "Course, schedule or purchases not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
#[instrument(skip(state, token, dto))]
pub async fn refresh_purchases(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedJson(dto): ValidatedJson<RefreshPurchasesDto>,
) -> Result<Json<RefreshPurchasesResponse>, AppError> {
    let response = PurchaseService::refresh_purchases(&state, token.as_deref(), dto).await?;
    Ok(Json(response))
}

/// Cancel the caller's reservation or enrollment (clients only)
#[utoipa::path(
    delete,
    path = "/api/purchases/{tenant_id}/{course_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("course_id" = String, Path, description = "Course id (UUID)")
    ),
    responses(
        (status = 200, description = "Purchase cancelled", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Not a client", body = ErrorResponse),
        (status = 404, description = "No purchase of this course", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
#[instrument(skip(state, token))]
pub async fn delete_purchase(
    State(state): State<AppState>,
    token: BearerToken,
    Path((tenant_id, course_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let course_id: CourseId = course_id
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("course_id must be a UUID")))?;
    let key = PurchaseKey {
        tenant_id,
        course_id,
    };
    let response = PurchaseService::delete_purchase(&state, token.as_deref(), key).await?;
    Ok(Json(response))
}
