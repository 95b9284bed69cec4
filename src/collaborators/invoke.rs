//! Client for `POST {base}/invoke/{function}`.

use atrium_config::CollaboratorConfig;
use atrium_core::{RequestEnvelope, ResponseEnvelope};
use tracing::{debug, instrument};

use super::error::CollaboratorError;

#[derive(Clone, Debug)]
pub struct FunctionClient {
    http: reqwest::Client,
    base_url: String,
}

impl FunctionClient {
    /// Single-attempt client bounded by the configured timeout.
    pub fn new(base_url: impl Into<String>, config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(CollaboratorError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invokes a function and returns its envelope, whatever its `statusCode`.
    #[instrument(skip(self, request), fields(function = %function))]
    pub async fn invoke(
        &self,
        function: &str,
        request: &RequestEnvelope,
    ) -> Result<ResponseEnvelope, CollaboratorError> {
        let url = format!("{}/invoke/{}", self.base_url, function);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| CollaboratorError::from_reqwest(function, e))?;

        if !response.status().is_success() {
            return Err(CollaboratorError::Status {
                target: function.to_string(),
                status: response.status().as_u16(),
            });
        }

        let envelope: ResponseEnvelope =
            response
                .json()
                .await
                .map_err(|e| CollaboratorError::InvalidResponse {
                    target: function.to_string(),
                    reason: e.to_string(),
                })?;

        debug!(status = envelope.status_code, "Function responded");
        Ok(envelope)
    }
}
