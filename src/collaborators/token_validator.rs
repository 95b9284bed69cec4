use async_trait::async_trait;
use atrium_auth::{AuthError, TokenValidator};
use atrium_core::RequestEnvelope;
use atrium_models::{Claim, ValidateTokenResponse};
use serde_json::json;
use tracing::warn;

use super::invoke::FunctionClient;

/// Validates tokens by invoking the `validate-token` function.
#[derive(Clone, Debug)]
pub struct RemoteTokenValidator {
    client: FunctionClient,
    function: String,
}

impl RemoteTokenValidator {
    pub fn new(client: FunctionClient, function: impl Into<String>) -> Self {
        Self {
            client,
            function: function.into(),
        }
    }
}

#[async_trait]
impl TokenValidator for RemoteTokenValidator {
    async fn validate(&self, token: &str, tenant_id: &str) -> Result<Claim, AuthError> {
        let request = RequestEnvelope::new(format!("/{}", self.function))
            .with_header("Authorization", format!("Bearer {}", token))
            .with_body(json!({ "tenant_id": tenant_id }));

        let response = self
            .client
            .invoke(&self.function, &request)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        match response.status_code {
            200 => serde_json::from_value::<ValidateTokenResponse>(response.body)
                .map(|validated| validated.claim)
                .map_err(|e| {
                    warn!(error = %e, "Validator returned an unreadable claim");
                    AuthError::Unavailable(format!("invalid claim: {}", e))
                }),
            400..=499 => Err(AuthError::TokenNotFound),
            status => Err(AuthError::Unavailable(format!(
                "{} responded with status {}",
                self.function, status
            ))),
        }
    }
}
