use atrium_core::serde::{deserialize_optional_i64, deserialize_optional_string};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{CourseId, ScheduleId};

/// Default page size for schedule listings.
pub const DEFAULT_SCHEDULE_LIMIT: i64 = 5;

/// Wire format of `start_time` and `end_time`.
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Sort key of the schedule table: `course_id#schedule_id`.
pub fn schedule_sort_key(course_id: &CourseId, schedule_id: &ScheduleId) -> String {
    format!("{}#{}", course_id, schedule_id)
}

/// Parses an `HH:MM` wall-clock time.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

/// Weekly time slot of a course. Items are keyed by `tenant_id` and
/// `course_id#schedule_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Schedule {
    pub schedule_id: ScheduleId,
    pub tenant_id: String,
    pub course_id: CourseId,
    pub days: Vec<Weekday>,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`, after `start_time`
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Schedule {
    /// Two slots clash when they share a day and their time ranges overlap.
    /// Touching ranges (one ends when the other starts) do not clash.
    pub fn clashes_with(&self, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> bool {
        let (Some(own_start), Some(own_end)) =
            (parse_time(&self.start_time), parse_time(&self.end_time))
        else {
            return false;
        };

        self.days.iter().any(|day| days.contains(day)) && start < own_end && end > own_start
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateScheduleDto {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub course_id: CourseId,
    #[validate(length(min = 1, message = "days must name at least one weekday"))]
    pub days: Vec<Weekday>,
    #[validate(length(min = 1, message = "start_time is required"))]
    pub start_time: String,
    #[validate(length(min = 1, message = "end_time is required"))]
    pub end_time: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduleDto {
    #[validate(length(min = 1, message = "days must name at least one weekday"))]
    pub days: Option<Vec<Weekday>>,
    #[validate(length(min = 1, message = "start_time cannot be empty"))]
    pub start_time: Option<String>,
    #[validate(length(min = 1, message = "end_time cannot be empty"))]
    pub end_time: Option<String>,
}

impl UpdateScheduleDto {
    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(days) = &self.days {
            changes.insert("days".into(), json!(days));
        }
        if let Some(start_time) = &self.start_time {
            changes.insert("start_time".into(), json!(start_time.trim()));
        }
        if let Some(end_time) = &self.end_time {
            changes.insert("end_time".into(), json!(end_time.trim()));
        }
        changes
    }
}

/// Locates a single schedule.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct ScheduleKey {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub course_id: CourseId,
    pub schedule_id: ScheduleId,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct ListSchedulesQuery {
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    pub course_id: CourseId,
    /// Page size (1-100, default: 5)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Exclusive cursor: the last `schedule_id` of the previous page
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_schedule_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleList {
    pub schedules: Vec<Schedule>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_schedule_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateScheduleResponse {
    pub message: String,
    pub schedule: Schedule,
}
