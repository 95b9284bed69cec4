//! One-off records created from the command line.

use std::error::Error;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use atrium_core::PasswordDigest;
use atrium_models::{Organization, UserRecord, UserRole};

use crate::Stores;

/// Registers an organization with the next free port.
pub async fn create_organization(
    stores: &Stores,
    tenant_id: &str,
    domain: &str,
    description: &str,
    email: &str,
) -> Result<Organization, Box<dyn Error>> {
    if stores.organizations.exists(tenant_id).await? {
        return Err(format!("Organization '{}' already exists", tenant_id).into());
    }

    let organization = Organization {
        tenant_id: tenant_id.to_string(),
        domain: domain.to_string(),
        description: description.to_string(),
        email: email.to_string(),
        detail: Some(json!({})),
        port: stores.organizations.next_port().await?,
        created_at: Utc::now(),
        updated_at: None,
    };

    if !stores.organizations.insert(&organization).await? {
        return Err(format!("Organization '{}' already exists", tenant_id).into());
    }

    info!(tenant.id = %tenant_id, port = organization.port, "Organization created");
    Ok(organization)
}

/// Creates the single admin of a tenant. Fails if the tenant is unknown or
/// already has one.
pub async fn create_admin(
    stores: &Stores,
    digest: &dyn PasswordDigest,
    tenant_id: &str,
    dni: &str,
    full_name: &str,
    password: &str,
) -> Result<UserRecord, Box<dyn Error>> {
    if !stores.organizations.exists(tenant_id).await? {
        return Err(format!("Organization '{}' not found", tenant_id).into());
    }
    if !stores.credentials.claim_admin_slot(tenant_id).await? {
        return Err(format!("Organization '{}' already has an admin", tenant_id).into());
    }

    let record = UserRecord {
        tenant_id: tenant_id.to_string(),
        dni: dni.to_string(),
        full_name: full_name.to_string(),
        role: UserRole::Admin,
        password_digest: digest.digest(password)?,
        detail: None,
        created_at: Utc::now(),
    };

    match stores.credentials.insert_user(&record).await {
        Ok(true) => {
            info!(tenant.id = %tenant_id, user.dni = %dni, "Admin created");
            Ok(record)
        }
        Ok(false) => {
            stores.credentials.release_admin_slot(tenant_id).await?;
            Err(format!("User '{}' already exists", dni).into())
        }
        Err(e) => {
            stores.credentials.release_admin_slot(tenant_id).await?;
            Err(e.into())
        }
    }
}
