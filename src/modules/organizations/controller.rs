use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use atrium_core::{AppError, ValidatedJson};
use atrium_models::{
    CreateOrganizationDto, CreateOrganizationResponse, Organization, OrganizationList,
    UpdateOrganizationDto, UpdateOrganizationResponse,
};

use super::service::OrganizationService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::BearerToken;
use crate::state::AppState;

/// Register an organization (tenant)
#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = CreateOrganizationDto,
    responses(
        (status = 200, description = "Organization created", body = CreateOrganizationResponse),
        (status = 400, description = "Missing fields or detail is not an object", body = ErrorResponse),
        (status = 409, description = "Tenant already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organizations"
)]
#[instrument(skip(state, dto))]
pub async fn create_organization(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateOrganizationDto>,
) -> Result<Json<CreateOrganizationResponse>, AppError> {
    let response = OrganizationService::create_organization(&state, dto).await?;
    Ok(Json(response))
}

/// List all organizations
#[utoipa::path(
    get,
    path = "/api/organizations",
    responses(
        (status = 200, description = "All organizations, unordered", body = OrganizationList),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organizations"
)]
#[instrument(skip(state))]
pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<OrganizationList>, AppError> {
    let organizations = OrganizationService::list_organizations(&state).await?;
    Ok(Json(organizations))
}

/// Get an organization by tenant id
#[utoipa::path(
    get,
    path = "/api/organizations/{tenant_id}",
    params(("tenant_id" = String, Path, description = "Tenant id")),
    responses(
        (status = 200, description = "Organization found", body = Organization),
        (status = 404, description = "Organization not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organizations"
)]
#[instrument(skip(state))]
pub async fn get_organization(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<Organization>, AppError> {
    let organization = OrganizationService::get_organization(&state, &tenant_id).await?;
    Ok(Json(organization))
}

/// Update an organization (tenant admin only)
#[utoipa::path(
    patch,
    path = "/api/organizations/{tenant_id}",
    params(("tenant_id" = String, Path, description = "Tenant id")),
    request_body = UpdateOrganizationDto,
    responses(
        (status = 200, description = "Organization updated", body = UpdateOrganizationResponse),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse),
        (status = 503, description = "Token validation unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Organizations"
)]
#[instrument(skip(state, token, dto))]
pub async fn update_organization(
    State(state): State<AppState>,
    token: BearerToken,
    Path(tenant_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateOrganizationDto>,
) -> Result<Json<UpdateOrganizationResponse>, AppError> {
    let response =
        OrganizationService::update_organization(&state, token.as_deref(), &tenant_id, dto)
            .await?;
    Ok(Json(response))
}
