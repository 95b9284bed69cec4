use std::sync::Arc;

use atrium_config::TableNames;
use atrium_models::schedules::schedule_sort_key;
use atrium_models::{CourseId, Schedule, ScheduleId};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::store::{Item, ItemKey, KeyValueStore, Query, StoreError};

/// Schedule table adapter; items are keyed by `(tenant_id, course_id#schedule_id)`.
#[derive(Clone, Debug)]
pub struct ScheduleStore {
    store: Arc<dyn KeyValueStore>,
    schedules_table: String,
}

impl ScheduleStore {
    pub fn new(store: Arc<dyn KeyValueStore>, tables: &TableNames) -> Self {
        Self {
            store,
            schedules_table: tables.schedules.clone(),
        }
    }

    fn key(tenant_id: &str, course_id: &CourseId, schedule_id: &ScheduleId) -> ItemKey {
        ItemKey::new(tenant_id, schedule_sort_key(course_id, schedule_id))
    }

    pub async fn get(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        schedule_id: &ScheduleId,
    ) -> Result<Option<Schedule>, StoreError> {
        self.store
            .get(&self.schedules_table, &Self::key(tenant_id, course_id, schedule_id))
            .await?
            .map(Item::into_record)
            .transpose()
    }

    pub async fn insert(&self, schedule: &Schedule) -> Result<bool, StoreError> {
        let key = Self::key(&schedule.tenant_id, &schedule.course_id, &schedule.schedule_id);
        self.store
            .put_if_absent(&self.schedules_table, Item::from_record(key, schedule)?)
            .await
    }

    pub async fn update(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        schedule_id: &ScheduleId,
        mut changes: Map<String, Value>,
    ) -> Result<Option<Schedule>, StoreError> {
        changes.insert("updated_at".into(), serde_json::to_value(Utc::now())?);
        self.store
            .update(
                &self.schedules_table,
                &Self::key(tenant_id, course_id, schedule_id),
                changes,
            )
            .await?
            .map(Item::into_record)
            .transpose()
    }

    pub async fn delete(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        schedule_id: &ScheduleId,
    ) -> Result<bool, StoreError> {
        self.store
            .delete(&self.schedules_table, &Self::key(tenant_id, course_id, schedule_id))
            .await
    }

    /// Schedules of one course in `schedule_id` order. `after` is a bare schedule id.
    pub async fn list(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Schedule>, StoreError> {
        let mut query = Query::new()
            .after(after.map(|id| format!("{}#{}", course_id, id)))
            .filter_eq("course_id", course_id.to_string());
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        self.store
            .query(&self.schedules_table, tenant_id, &query)
            .await?
            .into_iter()
            .map(Item::into_record)
            .collect()
    }
}
