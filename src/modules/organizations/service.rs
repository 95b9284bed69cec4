use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use atrium_core::AppError;
use atrium_core::validator::ensure_object;
use atrium_models::{
    CreateOrganizationDto, CreateOrganizationResponse, Organization, OrganizationList,
    UpdateOrganizationDto, UpdateOrganizationResponse, UserRole,
};
use atrium_observability::{track_organization_created, track_provisioning};

use crate::middleware::auth::require_role;
use crate::state::AppState;

pub struct OrganizationService;

impl OrganizationService {
    /// Registers a tenant, assigns its port and asks for provisioning.
    ///
    /// Provisioning is best-effort: a failure is logged and reported as
    /// `provisioned: false`, the organization stays registered.
    #[instrument(skip(state, dto), fields(tenant.id = %dto.tenant_id, db.table = "organizations"))]
    pub async fn create_organization(
        state: &AppState,
        dto: CreateOrganizationDto,
    ) -> Result<CreateOrganizationResponse, AppError> {
        ensure_object("detail", dto.detail.as_ref())?;

        if state.organizations.exists(&dto.tenant_id).await? {
            warn!("Attempted to create an existing organization");
            return Err(AppError::conflict(anyhow!(
                "Organization '{}' already exists",
                dto.tenant_id
            )));
        }

        let port = state.organizations.next_port().await?;
        let organization = Organization {
            tenant_id: dto.tenant_id,
            domain: dto.domain,
            description: dto.description,
            email: dto.email,
            detail: dto.detail,
            port,
            created_at: Utc::now(),
            updated_at: None,
        };

        // lost a race with a concurrent create; the drawn port is burned
        if !state.organizations.insert(&organization).await? {
            warn!(port, "Organization was created concurrently");
            return Err(AppError::conflict(anyhow!(
                "Organization '{}' already exists",
                organization.tenant_id
            )));
        }
        track_organization_created();

        let provisioned = match state
            .provisioner
            .provision(&organization.tenant_id, port)
            .await
        {
            Ok(requested) => {
                if requested {
                    track_provisioning(true);
                }
                requested
            }
            Err(e) => {
                warn!(error = %e, port, "Provisioning failed; organization kept");
                track_provisioning(false);
                false
            }
        };

        info!(port, provisioned, "Organization created");

        Ok(CreateOrganizationResponse {
            message: "Organization created successfully".to_string(),
            tenant_id: organization.tenant_id,
            port,
            provisioned,
        })
    }

    #[instrument(skip(state), fields(tenant.id = %tenant_id))]
    pub async fn get_organization(
        state: &AppState,
        tenant_id: &str,
    ) -> Result<Organization, AppError> {
        state
            .organizations
            .get(tenant_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow!("Organization '{}' not found", tenant_id))
            })
    }

    #[instrument(skip(state))]
    pub async fn list_organizations(state: &AppState) -> Result<OrganizationList, AppError> {
        let organizations = state.organizations.list().await?;
        debug!(count = organizations.len(), "Listed organizations");

        Ok(OrganizationList {
            total: organizations.len(),
            organizations,
        })
    }

    /// Admin of the tenant only. Only `domain`, `description`, `email` and
    /// `detail` can change.
    #[instrument(skip(state, token, dto), fields(tenant.id = %tenant_id))]
    pub async fn update_organization(
        state: &AppState,
        token: Option<&str>,
        tenant_id: &str,
        dto: UpdateOrganizationDto,
    ) -> Result<UpdateOrganizationResponse, AppError> {
        let claim = require_role(state, token, tenant_id, &[UserRole::Admin]).await?;

        ensure_object("detail", dto.detail.as_ref())?;
        let changes = dto.changes();
        if changes.is_empty() {
            return Err(AppError::bad_request(anyhow!(
                "No updatable fields provided (domain, description, email, detail)"
            )));
        }

        let mut updated_fields: Vec<String> = changes.keys().cloned().collect();
        updated_fields.sort();

        state
            .organizations
            .update(&claim.tenant_id, changes)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow!("Organization '{}' not found", tenant_id))
            })?;

        info!(fields = ?updated_fields, "Organization updated");

        Ok(UpdateOrganizationResponse {
            message: "Organization updated successfully".to_string(),
            tenant_id: claim.tenant_id,
            updated_fields,
        })
    }
}
