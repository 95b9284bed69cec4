use std::fmt::Debug;

use async_trait::async_trait;
use atrium_core::RequestEnvelope;
use atrium_db::OrganizationStore;

use super::error::CollaboratorError;
use super::invoke::FunctionClient;

/// Answers "is this tenant registered?" for user creation.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync + Debug {
    async fn exists(&self, tenant_id: &str) -> Result<bool, CollaboratorError>;
}

#[derive(Clone, Debug)]
pub struct LocalOrganizationDirectory {
    organizations: OrganizationStore,
}

impl LocalOrganizationDirectory {
    pub fn new(organizations: OrganizationStore) -> Self {
        Self { organizations }
    }
}

#[async_trait]
impl OrganizationDirectory for LocalOrganizationDirectory {
    async fn exists(&self, tenant_id: &str) -> Result<bool, CollaboratorError> {
        Ok(self.organizations.exists(tenant_id).await?)
    }
}

/// Looks tenants up through the `get-organization` function.
#[derive(Clone, Debug)]
pub struct RemoteOrganizationDirectory {
    client: FunctionClient,
    function: String,
}

impl RemoteOrganizationDirectory {
    pub fn new(client: FunctionClient, function: impl Into<String>) -> Self {
        Self {
            client,
            function: function.into(),
        }
    }
}

#[async_trait]
impl OrganizationDirectory for RemoteOrganizationDirectory {
    async fn exists(&self, tenant_id: &str) -> Result<bool, CollaboratorError> {
        let request = RequestEnvelope::new(format!("/{}", self.function))
            .with_query("tenant_id", tenant_id);

        let response = self.client.invoke(&self.function, &request).await?;
        match response.status_code {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(CollaboratorError::Status {
                target: self.function.clone(),
                status,
            }),
        }
    }
}
