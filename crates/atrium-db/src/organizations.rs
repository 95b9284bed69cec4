use std::sync::Arc;

use atrium_config::TableNames;
use atrium_models::Organization;
use atrium_models::organizations::BASE_PORT;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::store::{Item, ItemKey, KeyValueStore, StoreError};

const PORT_COUNTER: &str = "organization_port";

/// Organization table adapter plus the port counter.
#[derive(Clone, Debug)]
pub struct OrganizationStore {
    store: Arc<dyn KeyValueStore>,
    organizations_table: String,
    counters_table: String,
}

impl OrganizationStore {
    pub fn new(store: Arc<dyn KeyValueStore>, tables: &TableNames) -> Self {
        Self {
            store,
            organizations_table: tables.organizations.clone(),
            counters_table: tables.counters.clone(),
        }
    }

    pub async fn get(&self, tenant_id: &str) -> Result<Option<Organization>, StoreError> {
        self.store
            .get(&self.organizations_table, &ItemKey::partition_only(tenant_id))
            .await?
            .map(Item::into_record)
            .transpose()
    }

    pub async fn exists(&self, tenant_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(&self.organizations_table, &ItemKey::partition_only(tenant_id))
            .await?
            .is_some())
    }

    /// Inserts unless the tenant id is taken.
    pub async fn insert(&self, organization: &Organization) -> Result<bool, StoreError> {
        let key = ItemKey::partition_only(&organization.tenant_id);
        self.store
            .put_if_absent(
                &self.organizations_table,
                Item::from_record(key, organization)?,
            )
            .await
    }

    /// Merges allow-listed changes and stamps `updated_at`.
    pub async fn update(
        &self,
        tenant_id: &str,
        mut changes: Map<String, Value>,
    ) -> Result<Option<Organization>, StoreError> {
        changes.insert("updated_at".into(), serde_json::to_value(Utc::now())?);
        self.store
            .update(
                &self.organizations_table,
                &ItemKey::partition_only(tenant_id),
                changes,
            )
            .await?
            .map(Item::into_record)
            .transpose()
    }

    pub async fn list(&self) -> Result<Vec<Organization>, StoreError> {
        self.store
            .scan(&self.organizations_table)
            .await?
            .into_iter()
            .map(Item::into_record)
            .collect()
    }

    /// Next service port. Ports are never reused, even when the creation that
    /// drew one fails afterwards.
    #[instrument(skip(self))]
    pub async fn next_port(&self) -> Result<i64, StoreError> {
        let n = self
            .store
            .increment(
                &self.counters_table,
                &ItemKey::partition_only(PORT_COUNTER),
                "value",
            )
            .await?;
        let port = BASE_PORT + (n - 1);
        info!(port, "Assigned organization port");
        Ok(port)
    }
}
