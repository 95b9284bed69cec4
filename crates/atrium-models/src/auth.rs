use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::SessionTokenId;
use crate::users::UserRole;

/// Stored session; keyed by `(tenant_id, token)` in the token table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: SessionTokenId,
    pub tenant_id: String,
    pub dni: String,
    pub full_name: String,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SessionToken {
    /// A token is valid through its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Identity attached to a validated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claim {
    pub tenant_id: String,
    pub dni: String,
    pub full_name: String,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

impl Claim {
    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }
}

impl From<&SessionToken> for Claim {
    fn from(session: &SessionToken) -> Self {
        Self {
            tenant_id: session.tenant_id.clone(),
            dni: session.dni.clone(),
            full_name: session.full_name.clone(),
            role: session.role,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, message = "dni is required"))]
    pub dni: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// When omitted, admin, instructor and client records are tried in that order.
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: SessionTokenId,
    pub expires_at: DateTime<Utc>,
    pub tenant_id: String,
    pub dni: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Body of logout and validate calls. The token may also travel in `Authorization`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidateTokenResponse {
    pub message: String,
    #[serde(flatten)]
    pub claim: Claim,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
