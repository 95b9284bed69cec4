use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use atrium_core::{AppError, ValidatedJson, ValidatedQuery};
use atrium_models::{
    CreateUserDto, CreateUserResponse, GetUserQuery, ListUsersQuery, User, UserList, UserRole,
};
use validator::Validate;

use super::service::UserService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::BearerToken;
use crate::state::AppState;

/// Register a user
///
/// Creating an instructor requires an admin token for the tenant.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Missing fields, unknown role or invalid detail", body = ErrorResponse),
        (status = 401, description = "Instructor creation without a valid token", body = ErrorResponse),
        (status = 403, description = "Instructor creation by a non-admin", body = ErrorResponse),
        (status = 404, description = "Tenant not registered", body = ErrorResponse),
        (status = 409, description = "User exists or tenant already has an admin", body = ErrorResponse),
        (status = 503, description = "Collaborator unavailable", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, token, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Json<CreateUserResponse>, AppError> {
    let response = UserService::create_user(&state, token.as_deref(), dto).await?;
    Ok(Json(response))
}

/// Get a user by tenant, role and dni
#[utoipa::path(
    get,
    path = "/api/users/{tenant_id}/{role}/{dni}",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("role" = UserRole, Path, description = "admin, instructor or client"),
        ("dni" = String, Path, description = "National id")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path((tenant_id, role, dni)): Path<(String, String, String)>,
) -> Result<Json<User>, AppError> {
    let role: UserRole = role
        .parse()
        .map_err(|e: String| AppError::bad_request(anyhow!(e)))?;
    let query = GetUserQuery {
        tenant_id,
        role,
        dni,
    };
    query.validate()?;

    let user = UserService::get_user(&state, query).await?;
    Ok(Json(user))
}

/// List instructors or clients of a tenant (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserList),
        (status = 400, description = "Invalid role or parameters", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, token))]
pub async fn list_users(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<UserList>, AppError> {
    let users = UserService::list_users(&state, token.as_deref(), query).await?;
    Ok(Json(users))
}
