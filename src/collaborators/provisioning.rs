use std::fmt::Debug;

use async_trait::async_trait;
use atrium_config::CollaboratorConfig;
use serde_json::json;
use tracing::{info, instrument};

use super::error::CollaboratorError;

/// Notified once per new organization with its tenant id and port.
///
/// Returns whether provisioning was actually requested.
#[async_trait]
pub trait Provisioner: Send + Sync + Debug {
    async fn provision(&self, tenant_id: &str, port: i64) -> Result<bool, CollaboratorError>;
}

/// Used when no provisioning endpoint is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProvisioner;

#[async_trait]
impl Provisioner for NoopProvisioner {
    async fn provision(&self, _tenant_id: &str, _port: i64) -> Result<bool, CollaboratorError> {
        Ok(false)
    }
}

/// Posts `{tenant_id, port}` to `PROVISIONING_URL`.
#[derive(Clone, Debug)]
pub struct HttpProvisioner {
    http: reqwest::Client,
    url: String,
}

impl HttpProvisioner {
    pub fn new(url: impl Into<String>, config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(CollaboratorError::Client)?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Provisioner for HttpProvisioner {
    #[instrument(skip(self), fields(tenant.id = %tenant_id))]
    async fn provision(&self, tenant_id: &str, port: i64) -> Result<bool, CollaboratorError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "tenant_id": tenant_id, "port": port }))
            .send()
            .await
            .map_err(|e| CollaboratorError::from_reqwest("provisioning", e))?;

        if !response.status().is_success() {
            return Err(CollaboratorError::Status {
                target: "provisioning".to_string(),
                status: response.status().as_u16(),
            });
        }

        info!(port, "Provisioning requested");
        Ok(true)
    }
}
