use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

use atrium_core::{AppError, envelope::parse_authorization};
use atrium_models::{Claim, UserRole};
use atrium_observability::track_authorization_denied;

use crate::state::AppState;

/// Session token from the `Authorization` header, `Bearer ` prefix optional.
///
/// Never rejects: a missing token is reported by the authorization delegate so
/// that REST and function calls fail the same way.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(
            parts
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_authorization),
        ))
    }
}

/// Runs the authorization delegate and counts denials.
pub async fn require_role(
    state: &AppState,
    token: Option<&str>,
    tenant_id: &str,
    roles: &[UserRole],
) -> Result<Claim, AppError> {
    state
        .delegate
        .authorize(token, Some(tenant_id), roles)
        .await
        .map_err(|err| {
            let err = AppError::from(err);
            let status = err.status.as_u16();
            if status == 401 || status == 403 {
                track_authorization_denied(status);
            }
            err
        })
}

/// Any valid session for the tenant.
pub async fn require_session(
    state: &AppState,
    token: Option<&str>,
    tenant_id: &str,
) -> Result<Claim, AppError> {
    require_role(state, token, tenant_id, &UserRole::LOGIN_ORDER).await
}
