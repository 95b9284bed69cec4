//! Opaque session tokens: issue at login, validate on every protected call,
//! revoke on logout.
//!
//! Tokens are random UUID v4 strings persisted in the token table together with
//! a snapshot of the user's identity. Nothing is encoded in the token itself, so
//! deleting the row is a complete revocation.

use std::sync::Arc;

use atrium_config::TokenConfig;
use atrium_core::PasswordDigest;
use atrium_db::CredentialStore;
use atrium_models::{Claim, SessionToken, SessionTokenId, UserRecord, UserRole};
use chrono::{Duration, SubsecRound};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::AuthError;

#[derive(Clone, Debug)]
pub struct TokenService {
    credentials: CredentialStore,
    digest: Arc<dyn PasswordDigest>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(
        credentials: CredentialStore,
        digest: Arc<dyn PasswordDigest>,
        config: &TokenConfig,
    ) -> Self {
        Self {
            credentials,
            digest,
            clock: Arc::new(SystemClock),
            ttl: Duration::seconds(config.ttl_seconds),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn digest(&self) -> &Arc<dyn PasswordDigest> {
        &self.digest
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The user `password` authenticates. Without a role, every role holding
    /// `dni` is tried in [`UserRole::LOGIN_ORDER`] and the first match wins.
    async fn authenticate(
        &self,
        tenant_id: &str,
        dni: &str,
        role: Option<UserRole>,
        password: &str,
    ) -> Result<Option<UserRecord>, AuthError> {
        let roles = match role {
            Some(role) => vec![role],
            None => UserRole::LOGIN_ORDER.to_vec(),
        };

        let mut found = false;
        for role in roles {
            let Some(record) = self.credentials.get_user(tenant_id, role, dni).await? else {
                continue;
            };
            found = true;
            if self.digest.verify(password, &record.password_digest)? {
                return Ok(Some(record));
            }
        }

        if found {
            warn!("Login failed: invalid password");
        } else {
            warn!("Login failed: user not found");
        }
        Ok(None)
    }

    /// Verifies the password and persists a fresh session.
    ///
    /// An unknown user and a wrong password fail the same way.
    #[instrument(skip(self, password), fields(tenant.id = %tenant_id, user.dni = %dni))]
    pub async fn issue(
        &self,
        tenant_id: &str,
        dni: &str,
        role: Option<UserRole>,
        password: &str,
    ) -> Result<SessionToken, AuthError> {
        let user = self
            .authenticate(tenant_id, dni, role, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let now = self.clock.now().trunc_subsecs(0);
        let session = SessionToken {
            token: SessionTokenId::new(),
            tenant_id: user.tenant_id,
            dni: user.dni,
            full_name: user.full_name,
            role: user.role,
            expires_at: now + self.ttl,
            created_at: now,
        };
        self.credentials.put_session(&session).await?;

        info!(user.role = %session.role, expires_at = %session.expires_at, "Session token issued");
        Ok(session)
    }

    #[instrument(skip(self, token), fields(tenant.id = %tenant_id))]
    pub async fn validate(&self, token: &str, tenant_id: &str) -> Result<Claim, AuthError> {
        let session = self
            .credentials
            .get_session(tenant_id, token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        // Expired sessions are dropped on first sight.
        if session.is_expired_at(self.clock.now()) {
            debug!(expires_at = %session.expires_at, "Token expired");
            self.credentials
                .delete_session(tenant_id, &session.token)
                .await?;
            return Err(AuthError::Expired);
        }

        Ok(Claim::from(&session))
    }

    /// Deletes the session. Unknown or malformed tokens are not an error.
    #[instrument(skip(self, token), fields(tenant.id = %tenant_id))]
    pub async fn revoke(&self, tenant_id: &str, token: &str) -> Result<bool, AuthError> {
        let Ok(id) = Uuid::parse_str(token.trim()) else {
            return Ok(false);
        };

        let removed = self
            .credentials
            .delete_session(tenant_id, &SessionTokenId::from_uuid(id))
            .await?;
        if removed {
            info!("Session token revoked");
        }
        Ok(removed)
    }
}
