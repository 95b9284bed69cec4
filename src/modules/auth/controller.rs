use axum::{Json, extract::State};
use tracing::instrument;

use atrium_core::{AppError, ValidatedJson};
use atrium_models::{
    LoginRequest, LoginResponse, MessageResponse, TokenRequest, ValidateTokenResponse,
};

use super::service::AuthService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::BearerToken;
use crate::state::AppState;

/// Login and receive a session token
///
/// When `role` is omitted the admin, instructor and client records are tried
/// in that order.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state, dto).await?;
    Ok(Json(response))
}

/// Revoke a session token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 400, description = "Missing tenant_id or token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, token, dto))]
pub async fn logout_user(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedJson(dto): ValidatedJson<TokenRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AuthService::logout(&state, dto, token.0).await?;
    Ok(Json(response))
}

/// Validate a session token and return its claim
#[utoipa::path(
    post,
    path = "/api/auth/validate",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = ValidateTokenResponse),
        (status = 400, description = "Missing tenant_id", body = ErrorResponse),
        (status = 401, description = "Missing, unknown or expired token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, token, dto))]
pub async fn validate_token(
    State(state): State<AppState>,
    token: BearerToken,
    ValidatedJson(dto): ValidatedJson<TokenRequest>,
) -> Result<Json<ValidateTokenResponse>, AppError> {
    let response = AuthService::validate_token(&state, dto, token.0).await?;
    Ok(Json(response))
}
