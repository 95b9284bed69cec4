use std::sync::Arc;

use atrium_config::TableNames;
use atrium_models::purchases::purchase_sort_key;
use atrium_models::{CourseId, Purchase, PurchaseStatus, ScheduleId};

use crate::store::{Item, ItemKey, KeyValueStore, Query, StoreError};

/// Purchase table adapter; items are keyed by `(tenant_id, course_id#dni)`.
#[derive(Clone, Debug)]
pub struct PurchaseStore {
    store: Arc<dyn KeyValueStore>,
    purchases_table: String,
}

impl PurchaseStore {
    pub fn new(store: Arc<dyn KeyValueStore>, tables: &TableNames) -> Self {
        Self {
            store,
            purchases_table: tables.purchases.clone(),
        }
    }

    fn key(tenant_id: &str, course_id: &CourseId, dni: &str) -> ItemKey {
        ItemKey::new(tenant_id, purchase_sort_key(course_id, dni))
    }

    pub async fn get(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        dni: &str,
    ) -> Result<Option<Purchase>, StoreError> {
        self.store
            .get(&self.purchases_table, &Self::key(tenant_id, course_id, dni))
            .await?
            .map(Item::into_record)
            .transpose()
    }

    /// Returns `false` when the client already holds a purchase of the course.
    pub async fn insert(&self, purchase: &Purchase) -> Result<bool, StoreError> {
        let key = Self::key(&purchase.tenant_id, &purchase.course_id, &purchase.dni);
        self.store
            .put_if_absent(&self.purchases_table, Item::from_record(key, purchase)?)
            .await
    }

    /// Overwrites the stored purchase.
    pub async fn replace(&self, purchase: &Purchase) -> Result<(), StoreError> {
        let key = Self::key(&purchase.tenant_id, &purchase.course_id, &purchase.dni);
        self.store
            .put(&self.purchases_table, Item::from_record(key, purchase)?)
            .await
    }

    pub async fn delete(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        dni: &str,
    ) -> Result<bool, StoreError> {
        self.store
            .delete(&self.purchases_table, &Self::key(tenant_id, course_id, dni))
            .await
    }

    /// One client's purchases in `course_id` order. `after_course` is a bare course id.
    pub async fn list_for_client(
        &self,
        tenant_id: &str,
        dni: &str,
        status: Option<PurchaseStatus>,
        after_course: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Purchase>, StoreError> {
        let mut query = Query::new()
            .after(after_course.map(|course| format!("{}#{}", course, dni)))
            .filter_eq("dni", dni)
            .limit(limit);
        if let Some(status) = status {
            query = query.filter_eq("status", status.as_str());
        }
        self.run(tenant_id, &query).await
    }

    /// Purchases of one course in `dni` order, optionally for one schedule.
    pub async fn list_for_course(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        schedule_id: Option<&ScheduleId>,
        status: Option<PurchaseStatus>,
        after_dni: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Purchase>, StoreError> {
        let mut query = Query::new()
            .after(after_dni.map(|dni| purchase_sort_key(course_id, dni)))
            .filter_eq("course_id", course_id.to_string());
        if let Some(schedule_id) = schedule_id {
            query = query.filter_eq("schedule_id", schedule_id.to_string());
        }
        if let Some(status) = status {
            query = query.filter_eq("status", status.as_str());
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.run(tenant_id, &query).await
    }

    async fn run(&self, tenant_id: &str, query: &Query) -> Result<Vec<Purchase>, StoreError> {
        self.store
            .query(&self.purchases_table, tenant_id, query)
            .await?
            .into_iter()
            .map(Item::into_record)
            .collect()
    }
}
