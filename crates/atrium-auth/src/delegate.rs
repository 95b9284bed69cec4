//! Role gate shared by every protected operation.
//!
//! Status convention: a missing, unknown or expired token is 401 no matter
//! which validator answered; a valid token with the wrong role is 403.

use std::sync::Arc;

use atrium_models::{Claim, UserRole};
use tracing::{debug, instrument, warn};

use crate::error::AuthError;
use crate::validator::TokenValidator;

#[derive(Clone, Debug)]
pub struct AuthorizationDelegate {
    validator: Arc<dyn TokenValidator>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn role_list(roles: &[UserRole]) -> String {
    roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(" or ")
}

impl AuthorizationDelegate {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }

    /// Validates `token` for `tenant_id` and requires one of `required`.
    #[instrument(skip(self, token), fields(tenant.id = tenant_id.unwrap_or_default()))]
    pub async fn authorize(
        &self,
        token: Option<&str>,
        tenant_id: Option<&str>,
        required: &[UserRole],
    ) -> Result<Claim, AuthError> {
        let tenant_id = present(tenant_id).ok_or(AuthError::MissingTenant)?;
        let token = present(token).ok_or(AuthError::MissingToken)?;

        let claim = match self.validator.validate(token, tenant_id).await {
            Ok(claim) => claim,
            Err(err @ (AuthError::Unavailable(_) | AuthError::Store(_))) => {
                warn!(error = %err, "Token validator failed");
                return Err(err);
            }
            Err(AuthError::Expired) => return Err(AuthError::Expired),
            Err(err) => {
                debug!(error = %err, "Token rejected");
                return Err(AuthError::TokenNotFound);
            }
        };

        // a validator must never hand back another tenant's claim
        if claim.tenant_id != tenant_id {
            warn!(claim.tenant = %claim.tenant_id, "Validator returned a claim for another tenant");
            return Err(AuthError::TokenNotFound);
        }

        if !claim.has_role(required) {
            debug!(user.role = %claim.role, "Role not permitted");
            return Err(AuthError::Forbidden {
                required: role_list(required),
            });
        }

        Ok(claim)
    }

    /// Any valid token for the tenant.
    pub async fn authorize_any(
        &self,
        token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> Result<Claim, AuthError> {
        self.authorize(token, tenant_id, &UserRole::LOGIN_ORDER)
            .await
    }
}
