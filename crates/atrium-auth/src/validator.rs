use std::fmt::Debug;

use async_trait::async_trait;
use atrium_models::Claim;

use crate::error::AuthError;
use crate::token_service::TokenService;

/// Resolves a token to the claim it carries.
///
/// Implemented in-process by [`TokenService`] and remotely by a client that
/// invokes the `validate-token` function.
#[async_trait]
pub trait TokenValidator: Send + Sync + Debug {
    async fn validate(&self, token: &str, tenant_id: &str) -> Result<Claim, AuthError>;
}

#[async_trait]
impl TokenValidator for TokenService {
    async fn validate(&self, token: &str, tenant_id: &str) -> Result<Claim, AuthError> {
        TokenService::validate(self, token, tenant_id).await
    }
}
