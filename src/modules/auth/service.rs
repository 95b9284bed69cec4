use anyhow::anyhow;
use tracing::{info, instrument, warn};

use atrium_auth::AuthError;
use atrium_core::AppError;
use atrium_models::{
    Claim, LoginRequest, LoginResponse, MessageResponse, TokenRequest, ValidateTokenResponse,
};
use atrium_observability::{
    track_token_issued, track_token_revoked, track_user_login_failure, track_user_login_success,
};

use crate::state::AppState;

pub struct AuthService;

impl AuthService {
    #[instrument(skip(state, dto), fields(tenant.id = %dto.tenant_id, user.dni = %dto.dni))]
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<LoginResponse, AppError> {
        let session = match state
            .tokens
            .issue(&dto.tenant_id, &dto.dni, dto.role, &dto.password)
            .await
        {
            Ok(session) => session,
            Err(err) => {
                if matches!(err, AuthError::InvalidCredentials) {
                    track_user_login_failure("invalid_credentials");
                }
                return Err(err.into());
            }
        };

        track_user_login_success(session.role.as_str());
        track_token_issued();
        info!(user.role = %session.role, "User logged in");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token: session.token,
            expires_at: session.expires_at,
            tenant_id: session.tenant_id,
            dni: session.dni,
            full_name: session.full_name,
            role: session.role,
        })
    }

    /// Deletes the session. Logging out twice is not an error.
    #[instrument(skip(state, dto, header_token), fields(tenant.id = %dto.tenant_id))]
    pub async fn logout(
        state: &AppState,
        dto: TokenRequest,
        header_token: Option<String>,
    ) -> Result<MessageResponse, AppError> {
        let token = Self::token_of(&dto, header_token)
            .ok_or_else(|| AppError::bad_request(anyhow!("token is required")))?;

        if state.tokens.revoke(&dto.tenant_id, &token).await? {
            track_token_revoked();
        } else {
            warn!("Logout for an unknown or already revoked token");
        }

        Ok(MessageResponse::new("Logout successful"))
    }

    /// The validation entry point used by the authorization delegate.
    #[instrument(skip(state, dto, header_token), fields(tenant.id = %dto.tenant_id))]
    pub async fn validate_token(
        state: &AppState,
        dto: TokenRequest,
        header_token: Option<String>,
    ) -> Result<ValidateTokenResponse, AppError> {
        let token = Self::token_of(&dto, header_token).ok_or(AuthError::MissingToken)?;
        let claim: Claim = state.tokens.validate(&token, &dto.tenant_id).await?;

        Ok(ValidateTokenResponse {
            message: "Token is valid".to_string(),
            claim,
        })
    }

    /// Body token first, then `Authorization`.
    fn token_of(dto: &TokenRequest, header_token: Option<String>) -> Option<String> {
        dto.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or(header_token)
    }
}
