use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use atrium_core::{AppError, CursorPage, clamp_limit};
use atrium_models::courses::DEFAULT_COURSE_LIMIT;
use atrium_models::{
    Claim, Course, CourseId, CourseKey, CourseList, CreateCourseDto, ListCoursesQuery,
    MessageResponse, UpdateCourseDto, UpdateCourseResponse, UserRole,
};

use crate::middleware::auth::{require_role, require_session};
use crate::state::AppState;

fn check_schedule(starts_on: NaiveDate, ends_on: NaiveDate) -> Result<(), AppError> {
    if ends_on < starts_on {
        return Err(AppError::bad_request(anyhow!(
            "ends_on must not be before starts_on"
        )));
    }
    Ok(())
}

fn not_found(course_id: &CourseId) -> AppError {
    AppError::not_found(anyhow!("Course '{}' not found", course_id))
}

pub struct CourseService;

impl CourseService {
    /// Instructors only; the course is owned by the calling instructor.
    #[instrument(skip(state, token, dto), fields(tenant.id = %dto.tenant_id))]
    pub async fn create_course(
        state: &AppState,
        token: Option<&str>,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let claim = require_role(state, token, &dto.tenant_id, &[UserRole::Instructor]).await?;
        check_schedule(dto.starts_on, dto.ends_on)?;

        let course = Course {
            course_id: CourseId::new(),
            tenant_id: claim.tenant_id,
            name: dto.name,
            description: dto.description,
            starts_on: dto.starts_on,
            ends_on: dto.ends_on,
            price: dto.price,
            instructor_dni: claim.dni,
            instructor_name: claim.full_name,
            created_at: Utc::now(),
            updated_at: None,
        };

        if !state.courses.insert(&course).await? {
            return Err(AppError::conflict(anyhow!(
                "Course '{}' already exists",
                course.course_id
            )));
        }

        info!(course.id = %course.course_id, "Course created");
        Ok(course)
    }

    #[instrument(skip(state, token), fields(tenant.id = %key.tenant_id, course.id = %key.course_id))]
    pub async fn get_course(
        state: &AppState,
        token: Option<&str>,
        key: CourseKey,
    ) -> Result<Course, AppError> {
        let claim = require_session(state, token, &key.tenant_id).await?;

        state
            .courses
            .get(&claim.tenant_id, &key.course_id)
            .await?
            .ok_or_else(|| not_found(&key.course_id))
    }

    /// Any session of the tenant. Ordered by `course_id`, exclusive cursor.
    #[instrument(skip(state, token), fields(tenant.id = %query.tenant_id))]
    pub async fn list_courses(
        state: &AppState,
        token: Option<&str>,
        query: ListCoursesQuery,
    ) -> Result<CourseList, AppError> {
        let claim = require_session(state, token, &query.tenant_id).await?;

        let limit = clamp_limit(query.limit, DEFAULT_COURSE_LIMIT);
        let courses = state
            .courses
            .list(
                &claim.tenant_id,
                query.last_course_id,
                limit + 1,
                query.instructor_dni.as_deref(),
            )
            .await?;

        let page = CursorPage::from_overfetch(courses, limit, |course| {
            course.course_id.to_string()
        });
        debug!(count = page.items.len(), has_more = page.next.is_some(), "Listed courses");

        Ok(CourseList {
            count: page.items.len(),
            courses: page.items,
            last_course_id: page.next,
        })
    }

    /// Admins any course; instructors only the ones they teach. A dni is unique
    /// per role only, so the role has to match as well.
    pub fn may_modify(claim: &Claim, course: &Course) -> bool {
        claim.role == UserRole::Admin
            || (claim.role == UserRole::Instructor && claim.dni == course.instructor_dni)
    }

    /// Loads a course the caller may modify: admins any, instructors their own.
    pub(crate) async fn owned_course(
        state: &AppState,
        claim: &Claim,
        course_id: &CourseId,
    ) -> Result<Course, AppError> {
        let course = state
            .courses
            .get(&claim.tenant_id, course_id)
            .await?
            .ok_or_else(|| not_found(course_id))?;

        if !Self::may_modify(claim, &course) {
            warn!(user.dni = %claim.dni, "Course modification by a non-owner");
            return Err(AppError::forbidden(anyhow!(
                "Only an admin or the course instructor can modify this course"
            )));
        }

        Ok(course)
    }

    #[instrument(skip(state, token, dto), fields(tenant.id = %key.tenant_id, course.id = %key.course_id))]
    pub async fn update_course(
        state: &AppState,
        token: Option<&str>,
        key: CourseKey,
        dto: UpdateCourseDto,
    ) -> Result<UpdateCourseResponse, AppError> {
        let claim = require_session(state, token, &key.tenant_id).await?;
        let current = Self::owned_course(state, &claim, &key.course_id).await?;

        let changes = dto.changes();
        if changes.is_empty() {
            return Err(AppError::bad_request(anyhow!(
                "No updatable fields provided (name, description, starts_on, ends_on, price)"
            )));
        }
        check_schedule(
            dto.starts_on.unwrap_or(current.starts_on),
            dto.ends_on.unwrap_or(current.ends_on),
        )?;

        let course = state
            .courses
            .update(&claim.tenant_id, &key.course_id, changes)
            .await?
            .ok_or_else(|| not_found(&key.course_id))?;

        info!("Course updated");
        Ok(UpdateCourseResponse {
            message: "Course updated successfully".to_string(),
            course,
        })
    }

    #[instrument(skip(state, token), fields(tenant.id = %key.tenant_id, course.id = %key.course_id))]
    pub async fn delete_course(
        state: &AppState,
        token: Option<&str>,
        key: CourseKey,
    ) -> Result<MessageResponse, AppError> {
        let claim = require_session(state, token, &key.tenant_id).await?;
        Self::owned_course(state, &claim, &key.course_id).await?;

        if !state.courses.delete(&claim.tenant_id, &key.course_id).await? {
            return Err(not_found(&key.course_id));
        }

        info!("Course deleted");
        Ok(MessageResponse::new("Course deleted successfully"))
    }
}
