use atrium_core::serde::{deserialize_optional_i64, deserialize_optional_string};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::courses::Course;
use crate::ids::{CourseId, ScheduleId};
use crate::schedules::{Schedule, Weekday};

/// Default page size for purchase listings.
pub const DEFAULT_PURCHASE_LIMIT: i64 = 10;

/// A reservation can be upgraded to an enrollment; an enrollment is final.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    #[default]
    #[serde(alias = "reservado")]
    Reserved,
    #[serde(alias = "inscrito")]
    Enrolled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Reserved => "reserved",
            PurchaseStatus::Enrolled => "enrolled",
        }
    }
}

/// Sort key of the purchase table: `course_id#dni`. One purchase per client
/// and course.
pub fn purchase_sort_key(course_id: &CourseId, dni: &str) -> String {
    format!("{}#{}", course_id, dni)
}

/// A client's reservation or enrollment, with a snapshot of the course and
/// the chosen schedule taken when it was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Purchase {
    pub tenant_id: String,
    pub course_id: CourseId,
    pub schedule_id: ScheduleId,
    pub dni: String,
    pub full_name: String,
    pub status: PurchaseStatus,
    pub course_name: String,
    pub instructor_dni: String,
    pub instructor_name: String,
    pub price: f64,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub days: Vec<Weekday>,
    pub start_time: String,
    pub end_time: String,
    pub purchased_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Purchase {
    /// A new purchase of `schedule` within `course` by the client `dni`.
    pub fn new(
        dni: impl Into<String>,
        full_name: impl Into<String>,
        status: PurchaseStatus,
        course: &Course,
        schedule: &Schedule,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id: course.tenant_id.clone(),
            course_id: course.course_id,
            schedule_id: schedule.schedule_id,
            dni: dni.into(),
            full_name: full_name.into(),
            status,
            course_name: course.name.clone(),
            instructor_dni: course.instructor_dni.clone(),
            instructor_name: course.instructor_name.clone(),
            price: course.price,
            starts_on: course.starts_on,
            ends_on: course.ends_on,
            days: schedule.days.clone(),
            start_time: schedule.start_time.clone(),
            end_time: schedule.end_time.clone(),
            purchased_at: at,
            updated_at: None,
        }
    }

    /// Copies the course fields shown alongside a purchase.
    pub fn apply_course(&mut self, course: &Course) {
        self.course_name = course.name.clone();
        self.instructor_dni = course.instructor_dni.clone();
        self.instructor_name = course.instructor_name.clone();
        self.price = course.price;
        self.starts_on = course.starts_on;
        self.ends_on = course.ends_on;
    }

    pub fn apply_schedule(&mut self, schedule: &Schedule) {
        self.schedule_id = schedule.schedule_id;
        self.days = schedule.days.clone();
        self.start_time = schedule.start_time.clone();
        self.end_time = schedule.end_time.clone();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseDto {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub course_id: CourseId,
    pub schedule_id: ScheduleId,
    /// Defaults to `reserved`
    #[serde(default)]
    pub status: PurchaseStatus,
}

/// The caller's purchase of one course.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct PurchaseKey {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub course_id: CourseId,
}

/// Clients list their own purchases; admins and the course instructor list
/// the purchases of one course.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct ListPurchasesQuery {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    /// Required for admins and instructors
    #[serde(default)]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub status: Option<PurchaseStatus>,
    /// Page size (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Exclusive cursor: a `course_id` for clients, a `dni` for staff
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PurchaseList {
    pub purchases: Vec<Purchase>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_key: Option<String>,
}

/// Copies the current course, and optionally one schedule, into the purchases
/// that reference them.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshPurchasesDto {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub course_id: CourseId,
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RefreshPurchasesResponse {
    pub message: String,
    pub updated: usize,
}
