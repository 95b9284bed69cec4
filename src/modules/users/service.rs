use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use atrium_core::validator::ensure_object;
use atrium_core::{AppError, CursorPage, clamp_limit, pagination::DEFAULT_LIMIT};
use atrium_models::{
    CreateUserDto, CreateUserResponse, GetUserQuery, ListUsersQuery, User, UserList, UserRecord,
    UserRole,
};
use atrium_observability::track_user_created;

use crate::middleware::auth::require_role;
use crate::state::AppState;

pub struct UserService;

impl UserService {
    /// Registers a user under `tenant_id#role`.
    ///
    /// - admin: at most one per tenant, reserved through an atomic sentinel
    /// - instructor: requires an admin token for the tenant
    /// - client: open registration
    #[instrument(skip(state, token, dto), fields(tenant.id = %dto.tenant_id, user.dni = %dto.dni, user.role = %dto.role))]
    pub async fn create_user(
        state: &AppState,
        token: Option<&str>,
        dto: CreateUserDto,
    ) -> Result<CreateUserResponse, AppError> {
        ensure_object("detail", dto.detail.as_ref())?;

        if !state.directory.exists(&dto.tenant_id).await? {
            warn!("User creation for an unregistered tenant");
            return Err(AppError::not_found(anyhow!(
                "Tenant '{}' is not registered",
                dto.tenant_id
            )));
        }

        match dto.role {
            UserRole::Admin => {
                if !state.credentials.claim_admin_slot(&dto.tenant_id).await? {
                    warn!("Tenant already has an admin");
                    return Err(AppError::conflict(anyhow!(
                        "An admin already exists for tenant '{}'",
                        dto.tenant_id
                    )));
                }
            }
            UserRole::Instructor => {
                let claim = require_role(state, token, &dto.tenant_id, &[UserRole::Admin]).await?;
                debug!(admin.dni = %claim.dni, "Instructor creation authorized");
            }
            UserRole::Client => {}
        }

        let result = Self::insert_user(state, &dto).await;
        if dto.role == UserRole::Admin && !matches!(result, Ok(true)) {
            state.credentials.release_admin_slot(&dto.tenant_id).await?;
        }

        if !result? {
            warn!("User already exists");
            return Err(AppError::conflict(anyhow!(
                "User '{}' with role '{}' already exists",
                dto.dni,
                dto.role
            )));
        }

        track_user_created(dto.role.as_str());
        info!("User created");

        Ok(CreateUserResponse {
            message: "User created successfully".to_string(),
            tenant_id: dto.tenant_id,
            dni: dto.dni,
            role: dto.role,
        })
    }

    async fn insert_user(state: &AppState, dto: &CreateUserDto) -> Result<bool, AppError> {
        let password_digest = state.tokens.digest().digest(&dto.password)?;
        let record = UserRecord {
            tenant_id: dto.tenant_id.clone(),
            dni: dto.dni.clone(),
            full_name: dto.full_name.clone(),
            role: dto.role,
            password_digest,
            detail: dto.detail.clone(),
            created_at: Utc::now(),
        };
        Ok(state.credentials.insert_user(&record).await?)
    }

    /// Public lookup; the password digest is never returned.
    #[instrument(skip(state), fields(tenant.id = %query.tenant_id, user.dni = %query.dni))]
    pub async fn get_user(state: &AppState, query: GetUserQuery) -> Result<User, AppError> {
        state
            .credentials
            .get_user(&query.tenant_id, query.role, &query.dni)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Admin only. Ascending `dni`, exclusive cursor; `last_dni` is returned
    /// only while more records remain.
    #[instrument(skip(state, token), fields(tenant.id = %query.tenant_id, user.role = %query.role))]
    pub async fn list_users(
        state: &AppState,
        token: Option<&str>,
        query: ListUsersQuery,
    ) -> Result<UserList, AppError> {
        let claim = require_role(state, token, &query.tenant_id, &[UserRole::Admin]).await?;

        if !query.role.is_listable() {
            return Err(AppError::bad_request(anyhow!(
                "role must be instructor or client"
            )));
        }

        let limit = clamp_limit(query.limit, DEFAULT_LIMIT);
        let records = state
            .credentials
            .list_users(&claim.tenant_id, query.role, query.last_dni, limit + 1)
            .await?;

        let page = CursorPage::from_overfetch(records, limit, |record| record.dni.clone());
        debug!(count = page.items.len(), has_more = page.next.is_some(), "Listed users");

        Ok(UserList {
            users: page.items.into_iter().map(User::from).collect(),
            last_dni: page.next,
        })
    }
}
