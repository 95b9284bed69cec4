use atrium_core::serde::{deserialize_optional_i64, deserialize_optional_string};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::CourseId;

/// Default page size for course listings.
pub const DEFAULT_COURSE_LIMIT: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub course_id: CourseId,
    pub tenant_id: String,
    pub name: String,
    pub description: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub price: f64,
    pub instructor_dni: String,
    pub instructor_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than zero"))]
    pub price: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than zero"))]
    pub price: Option<f64>,
}

impl UpdateCourseDto {
    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(name) = &self.name {
            changes.insert("name".into(), json!(name));
        }
        if let Some(description) = &self.description {
            changes.insert("description".into(), json!(description));
        }
        if let Some(starts_on) = &self.starts_on {
            changes.insert("starts_on".into(), json!(starts_on));
        }
        if let Some(ends_on) = &self.ends_on {
            changes.insert("ends_on".into(), json!(ends_on));
        }
        if let Some(price) = self.price {
            changes.insert("price".into(), json!(price));
        }
        changes
    }
}

/// Locates a single course.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct CourseKey {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub course_id: CourseId,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct ListCoursesQuery {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    /// Page size (1-100, default: 5)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Exclusive cursor: the last `course_id` of the previous page
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_course_id: Option<String>,
    /// Only courses taught by this instructor
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub instructor_dni: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseList {
    pub courses: Vec<Course>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_course_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateCourseResponse {
    pub message: String,
    pub course: Course,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_rejects_non_positive_price() {
        let dto: CreateCourseDto = serde_json::from_value(json!({
            "tenant_id": "acme",
            "name": "Rust 101",
            "description": "Ownership and borrowing",
            "starts_on": "2026-01-10",
            "ends_on": "2026-03-10",
            "price": 0.0
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_changes_serialize_dates() {
        let dto: UpdateCourseDto = serde_json::from_value(json!({
            "ends_on": "2026-04-01",
            "instructor_dni": "ignored"
        }))
        .unwrap();
        let changes = dto.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["ends_on"], "2026-04-01");
    }
}
