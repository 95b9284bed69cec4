//! Envelope entry points for login, logout and token validation.

use atrium_core::{AppError, RequestEnvelope};
use atrium_models::{
    LoginRequest, LoginResponse, MessageResponse, TokenRequest, ValidateTokenResponse,
};

use super::service::AuthService;
use crate::state::AppState;

pub async fn login(state: &AppState, request: &RequestEnvelope) -> Result<LoginResponse, AppError> {
    let dto: LoginRequest = request.input()?;
    AuthService::login(state, dto).await
}

pub async fn logout(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<MessageResponse, AppError> {
    let dto: TokenRequest = request.input()?;
    AuthService::logout(state, dto, request.bearer_token()).await
}

pub async fn validate_token(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<ValidateTokenResponse, AppError> {
    let dto: TokenRequest = request.input()?;
    AuthService::validate_token(state, dto, request.bearer_token()).await
}
