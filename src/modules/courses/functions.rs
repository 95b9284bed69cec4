//! Envelope entry points for the course functions.

use atrium_core::{AppError, RequestEnvelope};
use atrium_models::{
    Course, CourseKey, CourseList, CreateCourseDto, ListCoursesQuery, MessageResponse,
    UpdateCourseDto, UpdateCourseResponse,
};

use super::service::CourseService;
use crate::state::AppState;

pub async fn create_course(state: &AppState, request: &RequestEnvelope) -> Result<Course, AppError> {
    let dto: CreateCourseDto = request.input()?;
    CourseService::create_course(state, request.bearer_token().as_deref(), dto).await
}

pub async fn get_course(state: &AppState, request: &RequestEnvelope) -> Result<Course, AppError> {
    let key: CourseKey = request.input()?;
    CourseService::get_course(state, request.bearer_token().as_deref(), key).await
}

pub async fn list_courses(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<CourseList, AppError> {
    let query: ListCoursesQuery = request.input()?;
    CourseService::list_courses(state, request.bearer_token().as_deref(), query).await
}

pub async fn update_course(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<UpdateCourseResponse, AppError> {
    let key: CourseKey = request.input()?;
    let dto: UpdateCourseDto = request.input()?;
    CourseService::update_course(state, request.bearer_token().as_deref(), key, dto).await
}

pub async fn delete_course(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<MessageResponse, AppError> {
    let key: CourseKey = request.input()?;
    CourseService::delete_course(state, request.bearer_token().as_deref(), key).await
}
