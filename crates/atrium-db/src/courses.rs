use std::sync::Arc;

use atrium_config::TableNames;
use atrium_models::{Course, CourseId};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::store::{Item, ItemKey, KeyValueStore, Query, StoreError};

/// Course table adapter; items are keyed by `(tenant_id, course_id)`.
#[derive(Clone, Debug)]
pub struct CourseStore {
    store: Arc<dyn KeyValueStore>,
    courses_table: String,
}

impl CourseStore {
    pub fn new(store: Arc<dyn KeyValueStore>, tables: &TableNames) -> Self {
        Self {
            store,
            courses_table: tables.courses.clone(),
        }
    }

    fn key(tenant_id: &str, course_id: &CourseId) -> ItemKey {
        ItemKey::new(tenant_id, course_id.to_string())
    }

    pub async fn get(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
    ) -> Result<Option<Course>, StoreError> {
        self.store
            .get(&self.courses_table, &Self::key(tenant_id, course_id))
            .await?
            .map(Item::into_record)
            .transpose()
    }

    pub async fn insert(&self, course: &Course) -> Result<bool, StoreError> {
        let key = Self::key(&course.tenant_id, &course.course_id);
        self.store
            .put_if_absent(&self.courses_table, Item::from_record(key, course)?)
            .await
    }

    pub async fn update(
        &self,
        tenant_id: &str,
        course_id: &CourseId,
        mut changes: Map<String, Value>,
    ) -> Result<Option<Course>, StoreError> {
        changes.insert("updated_at".into(), serde_json::to_value(Utc::now())?);
        self.store
            .update(&self.courses_table, &Self::key(tenant_id, course_id), changes)
            .await?
            .map(Item::into_record)
            .transpose()
    }

    pub async fn delete(&self, tenant_id: &str, course_id: &CourseId) -> Result<bool, StoreError> {
        self.store
            .delete(&self.courses_table, &Self::key(tenant_id, course_id))
            .await
    }

    /// Courses of a tenant in `course_id` order, optionally for one instructor.
    pub async fn list(
        &self,
        tenant_id: &str,
        after: Option<String>,
        limit: usize,
        instructor_dni: Option<&str>,
    ) -> Result<Vec<Course>, StoreError> {
        let mut query = Query::new().after(after).limit(limit);
        if let Some(dni) = instructor_dni {
            query = query.filter_eq("instructor_dni", dni);
        }

        self.store
            .query(&self.courses_table, tenant_id, &query)
            .await?
            .into_iter()
            .map(Item::into_record)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::NaiveDate;
    use serde_json::json;

    fn course(instructor: &str) -> Course {
        Course {
            course_id: CourseId::new(),
            tenant_id: "acme".into(),
            name: "Rust 101".into(),
            description: "Intro".into(),
            starts_on: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            price: 120.0,
            instructor_dni: instructor.into(),
            instructor_name: "Grace".into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_instructor() {
        let courses = CourseStore::new(Arc::new(MemoryStore::new()), &TableNames::default());
        for instructor in ["10", "20", "10"] {
            assert!(courses.insert(&course(instructor)).await.unwrap());
        }

        assert_eq!(courses.list("acme", None, 10, None).await.unwrap().len(), 3);
        let mine = courses.list("acme", None, 10, Some("10")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.instructor_dni == "10"));
        assert!(courses.list("globex", None, 10, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let courses = CourseStore::new(Arc::new(MemoryStore::new()), &TableNames::default());
        let c = course("10");
        courses.insert(&c).await.unwrap();

        let mut changes = Map::new();
        changes.insert("price".into(), json!(99.5));
        let updated = courses.update("acme", &c.course_id, changes).await.unwrap().unwrap();
        assert_eq!(updated.price, 99.5);

        assert!(courses.delete("acme", &c.course_id).await.unwrap());
        assert!(courses.get("acme", &c.course_id).await.unwrap().is_none());
    }
}
