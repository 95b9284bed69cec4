use anyhow::anyhow;
use chrono::{NaiveTime, Utc};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use atrium_core::{AppError, CursorPage, clamp_limit};
use atrium_models::schedules::{DEFAULT_SCHEDULE_LIMIT, parse_time};
use atrium_models::{
    CourseId, CreateScheduleDto, ListSchedulesQuery, MessageResponse, Schedule, ScheduleId,
    ScheduleKey, ScheduleList, UpdateScheduleDto, UpdateScheduleResponse, Weekday,
};

use crate::middleware::auth::require_session;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;

fn not_found(schedule_id: &ScheduleId) -> AppError {
    AppError::not_found(anyhow!("Schedule '{}' not found", schedule_id))
}

/// Parses both ends of a slot; the slot must not be empty.
fn time_range(start_time: &str, end_time: &str) -> Result<(NaiveTime, NaiveTime), AppError> {
    let (Some(start), Some(end)) = (parse_time(start_time), parse_time(end_time)) else {
        return Err(AppError::bad_request(anyhow!(
            "start_time and end_time must be HH:MM"
        )));
    };
    if end <= start {
        return Err(AppError::bad_request(anyhow!(
            "end_time must be after start_time"
        )));
    }
    Ok((start, end))
}

fn normalize_days(mut days: Vec<Weekday>) -> Vec<Weekday> {
    days.sort();
    days.dedup();
    days
}

pub struct ScheduleService;

impl ScheduleService {
    /// Rejects a slot overlapping another schedule of the same course.
    async fn check_clash(
        state: &AppState,
        tenant_id: &str,
        course_id: &CourseId,
        skip: Option<&ScheduleId>,
        days: &[Weekday],
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<(), AppError> {
        let existing = state.schedules.list(tenant_id, course_id, None, None).await?;
        let clash = existing
            .iter()
            .filter(|s| Some(&s.schedule_id) != skip)
            .find(|s| s.clashes_with(days, start, end));

        if let Some(other) = clash {
            warn!(other.id = %other.schedule_id, "Schedule clash");
            return Err(AppError::conflict(anyhow!(
                "Schedule clashes with schedule '{}' on at least one day",
                other.schedule_id
            )));
        }
        Ok(())
    }

    /// Admin or the course instructor.
    #[instrument(skip(state, token, dto), fields(tenant.id = %dto.tenant_id, course.id = %dto.course_id))]
    pub async fn create_schedule(
        state: &AppState,
        token: Option<&str>,
        dto: CreateScheduleDto,
    ) -> Result<Schedule, AppError> {
        let claim = require_session(state, token, &dto.tenant_id).await?;
        let course = CourseService::owned_course(state, &claim, &dto.course_id).await?;

        let (start, end) = time_range(&dto.start_time, &dto.end_time)?;
        let days = normalize_days(dto.days);
        Self::check_clash(state, &claim.tenant_id, &course.course_id, None, &days, start, end)
            .await?;

        let schedule = Schedule {
            schedule_id: ScheduleId::new(),
            tenant_id: claim.tenant_id,
            course_id: course.course_id,
            days,
            start_time: dto.start_time.trim().to_string(),
            end_time: dto.end_time.trim().to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        if !state.schedules.insert(&schedule).await? {
            return Err(AppError::conflict(anyhow!(
                "Schedule '{}' already exists",
                schedule.schedule_id
            )));
        }

        info!(schedule.id = %schedule.schedule_id, "Schedule created");
        Ok(schedule)
    }

    #[instrument(skip(state, token), fields(tenant.id = %key.tenant_id, schedule.id = %key.schedule_id))]
    pub async fn get_schedule(
        state: &AppState,
        token: Option<&str>,
        key: ScheduleKey,
    ) -> Result<Schedule, AppError> {
        let claim = require_session(state, token, &key.tenant_id).await?;

        state
            .schedules
            .get(&claim.tenant_id, &key.course_id, &key.schedule_id)
            .await?
            .ok_or_else(|| not_found(&key.schedule_id))
    }

    /// Any session of the tenant. Ordered by `schedule_id`, exclusive cursor.
    #[instrument(skip(state, token), fields(tenant.id = %query.tenant_id, course.id = %query.course_id))]
    pub async fn list_schedules(
        state: &AppState,
        token: Option<&str>,
        query: ListSchedulesQuery,
    ) -> Result<ScheduleList, AppError> {
        let claim = require_session(state, token, &query.tenant_id).await?;

        let limit = clamp_limit(query.limit, DEFAULT_SCHEDULE_LIMIT);
        let schedules = state
            .schedules
            .list(
                &claim.tenant_id,
                &query.course_id,
                query.last_schedule_id.as_deref(),
                Some(limit + 1),
            )
            .await?;

        let page = CursorPage::from_overfetch(schedules, limit, |schedule| {
            schedule.schedule_id.to_string()
        });
        debug!(count = page.items.len(), has_more = page.next.is_some(), "Listed schedules");

        Ok(ScheduleList {
            count: page.items.len(),
            schedules: page.items,
            last_schedule_id: page.next,
        })
    }

    #[instrument(skip(state, token, dto), fields(tenant.id = %key.tenant_id, schedule.id = %key.schedule_id))]
    pub async fn update_schedule(
        state: &AppState,
        token: Option<&str>,
        key: ScheduleKey,
        dto: UpdateScheduleDto,
    ) -> Result<UpdateScheduleResponse, AppError> {
        let claim = require_session(state, token, &key.tenant_id).await?;
        CourseService::owned_course(state, &claim, &key.course_id).await?;
        let current = state
            .schedules
            .get(&claim.tenant_id, &key.course_id, &key.schedule_id)
            .await?
            .ok_or_else(|| not_found(&key.schedule_id))?;

        let mut changes = dto.changes();
        if changes.is_empty() {
            return Err(AppError::bad_request(anyhow!(
                "No updatable fields provided (days, start_time, end_time)"
            )));
        }

        let (start, end) = time_range(
            dto.start_time.as_deref().unwrap_or(&current.start_time),
            dto.end_time.as_deref().unwrap_or(&current.end_time),
        )?;
        let days = normalize_days(dto.days.unwrap_or(current.days));
        Self::check_clash(
            state,
            &claim.tenant_id,
            &key.course_id,
            Some(&key.schedule_id),
            &days,
            start,
            end,
        )
        .await?;
        if changes.contains_key("days") {
            changes.insert("days".into(), json!(days));
        }

        let schedule = state
            .schedules
            .update(&claim.tenant_id, &key.course_id, &key.schedule_id, changes)
            .await?
            .ok_or_else(|| not_found(&key.schedule_id))?;

        info!("Schedule updated");
        Ok(UpdateScheduleResponse {
            message: "Schedule updated successfully".to_string(),
            schedule,
        })
    }

    #[instrument(skip(state, token), fields(tenant.id = %key.tenant_id, schedule.id = %key.schedule_id))]
    pub async fn delete_schedule(
        state: &AppState,
        token: Option<&str>,
        key: ScheduleKey,
    ) -> Result<MessageResponse, AppError> {
        let claim = require_session(state, token, &key.tenant_id).await?;
        CourseService::owned_course(state, &claim, &key.course_id).await?;

        if !state
            .schedules
            .delete(&claim.tenant_id, &key.course_id, &key.schedule_id)
            .await?
        {
            return Err(not_found(&key.schedule_id));
        }

        info!("Schedule deleted");
        Ok(MessageResponse::new("Schedule deleted successfully"))
    }
}
