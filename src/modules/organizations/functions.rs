//! Envelope entry points for the organization functions.

use atrium_core::{AppError, RequestEnvelope};
use atrium_models::{
    CreateOrganizationDto, CreateOrganizationResponse, Organization, OrganizationList,
    TenantQuery, UpdateOrganizationDto, UpdateOrganizationResponse,
};

use super::service::OrganizationService;
use crate::state::AppState;

pub async fn create_organization(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<CreateOrganizationResponse, AppError> {
    let dto: CreateOrganizationDto = request.input()?;
    OrganizationService::create_organization(state, dto).await
}

pub async fn get_organization(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<Organization, AppError> {
    let TenantQuery { tenant_id } = request.input()?;
    OrganizationService::get_organization(state, &tenant_id).await
}

pub async fn list_organizations(
    state: &AppState,
    _request: &RequestEnvelope,
) -> Result<OrganizationList, AppError> {
    OrganizationService::list_organizations(state).await
}

pub async fn update_organization(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<UpdateOrganizationResponse, AppError> {
    let TenantQuery { tenant_id } = request.input()?;
    let dto: UpdateOrganizationDto = request.input()?;
    let token = request.bearer_token();
    OrganizationService::update_organization(state, token.as_deref(), &tenant_id, dto).await
}
