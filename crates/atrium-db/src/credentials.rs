//! Credential Store adapter: users, sessions and the per-tenant admin slot.
//!
//! | Table    | Partition          | Sort   |
//! |----------|--------------------|--------|
//! | users    | `tenant_id#role`   | `dni`  |
//! | tokens   | `tenant_id`        | token  |
//! | counters | `admin#tenant_id`  | -      |

use std::sync::Arc;

use atrium_config::TableNames;
use atrium_models::{SessionToken, SessionTokenId, UserRecord, UserRole, user_partition};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::store::{Item, ItemKey, KeyValueStore, Query, StoreError};

#[derive(Clone, Debug)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    users_table: String,
    tokens_table: String,
    counters_table: String,
}

fn admin_slot_key(tenant_id: &str) -> ItemKey {
    ItemKey::partition_only(format!("admin#{}", tenant_id))
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>, tables: &TableNames) -> Self {
        Self {
            store,
            users_table: tables.users.clone(),
            tokens_table: tables.tokens.clone(),
            counters_table: tables.counters.clone(),
        }
    }

    #[instrument(skip(self), fields(tenant.id = %tenant_id, user.role = %role, user.dni = %dni))]
    pub async fn get_user(
        &self,
        tenant_id: &str,
        role: UserRole,
        dni: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let key = ItemKey::new(user_partition(tenant_id, role), dni);
        self.store
            .get(&self.users_table, &key)
            .await?
            .map(Item::into_record)
            .transpose()
    }

    /// Inserts a user unless `(tenant_id, role, dni)` is taken.
    #[instrument(skip(self, record), fields(tenant.id = %record.tenant_id, user.role = %record.role))]
    pub async fn insert_user(&self, record: &UserRecord) -> Result<bool, StoreError> {
        let key = ItemKey::new(user_partition(&record.tenant_id, record.role), &record.dni);
        self.store
            .put_if_absent(&self.users_table, Item::from_record(key, record)?)
            .await
    }

    /// Users of one role in ascending `dni` order, strictly after `after`.
    #[instrument(skip(self), fields(tenant.id = %tenant_id, user.role = %role))]
    pub async fn list_users(
        &self,
        tenant_id: &str,
        role: UserRole,
        after: Option<String>,
        limit: usize,
    ) -> Result<Vec<UserRecord>, StoreError> {
        let query = Query::new().after(after).limit(limit);
        self.store
            .query(&self.users_table, &user_partition(tenant_id, role), &query)
            .await?
            .into_iter()
            .map(Item::into_record)
            .collect()
    }

    /// Reserves the single admin seat of a tenant. Returns `false` if it is taken.
    #[instrument(skip(self), fields(tenant.id = %tenant_id))]
    pub async fn claim_admin_slot(&self, tenant_id: &str) -> Result<bool, StoreError> {
        let mut attributes = Map::new();
        attributes.insert("claimed_at".into(), Value::String(Utc::now().to_rfc3339()));

        let claimed = self
            .store
            .put_if_absent(
                &self.counters_table,
                Item::new(admin_slot_key(tenant_id), attributes),
            )
            .await?;

        if !claimed {
            debug!("Admin slot already taken");
        }
        Ok(claimed)
    }

    /// Frees the admin seat after a failed admin insert.
    pub async fn release_admin_slot(&self, tenant_id: &str) -> Result<(), StoreError> {
        if !self
            .store
            .delete(&self.counters_table, &admin_slot_key(tenant_id))
            .await?
        {
            warn!(tenant.id = %tenant_id, "Released an admin slot that was not held");
        }
        Ok(())
    }

    pub async fn put_session(&self, session: &SessionToken) -> Result<(), StoreError> {
        let key = ItemKey::new(&session.tenant_id, session.token.to_string());
        self.store
            .put(&self.tokens_table, Item::from_record(key, session)?)
            .await
    }

    pub async fn get_session(
        &self,
        tenant_id: &str,
        token: &str,
    ) -> Result<Option<SessionToken>, StoreError> {
        let key = ItemKey::new(tenant_id, token);
        self.store
            .get(&self.tokens_table, &key)
            .await?
            .map(Item::into_record)
            .transpose()
    }

    /// Idempotent; returns whether a session was removed.
    pub async fn delete_session(&self, tenant_id: &str, token: &SessionTokenId) -> Result<bool, StoreError> {
        let key = ItemKey::new(tenant_id, token.to_string());
        self.store.delete(&self.tokens_table, &key).await
    }
}
