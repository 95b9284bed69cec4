use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// First port handed out to a tenant; the n-th organization gets `BASE_PORT + n`.
pub const BASE_PORT: i64 = 9200;

/// Attributes an organization update may touch.
pub const UPDATABLE_FIELDS: [&str; 4] = ["domain", "description", "email", "detail"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Organization {
    pub tenant_id: String,
    pub domain: String,
    pub description: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub detail: Option<Value>,
    pub port: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationDto {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, message = "domain is required"))]
    pub domain: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub detail: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationDto {
    #[validate(length(min = 1, message = "domain cannot be empty"))]
    pub domain: Option<String>,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub detail: Option<Value>,
}

impl UpdateOrganizationDto {
    /// Allow-listed attributes that were supplied, in declaration order.
    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(domain) = &self.domain {
            changes.insert("domain".into(), Value::String(domain.clone()));
        }
        if let Some(description) = &self.description {
            changes.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(email) = &self.email {
            changes.insert("email".into(), Value::String(email.clone()));
        }
        if let Some(detail) = &self.detail {
            changes.insert("detail".into(), detail.clone());
        }
        changes
    }
}

/// Tenant selector for lookups that arrive through a query string.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct TenantQuery {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateOrganizationResponse {
    pub message: String,
    pub tenant_id: String,
    pub port: i64,
    /// Whether the provisioning hook acknowledged the new tenant.
    pub provisioned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrganizationResponse {
    pub message: String,
    pub tenant_id: String,
    pub updated_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganizationList {
    pub organizations: Vec<Organization>,
    pub total: usize,
}
