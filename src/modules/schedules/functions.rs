//! Envelope entry points for the schedule functions.

use atrium_core::{AppError, RequestEnvelope};
use atrium_models::{
    CreateScheduleDto, ListSchedulesQuery, MessageResponse, Schedule, ScheduleKey, ScheduleList,
    UpdateScheduleDto, UpdateScheduleResponse,
};

use super::service::ScheduleService;
use crate::state::AppState;

pub async fn create_schedule(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<Schedule, AppError> {
    let dto: CreateScheduleDto = request.input()?;
    ScheduleService::create_schedule(state, request.bearer_token().as_deref(), dto).await
}

pub async fn get_schedule(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<Schedule, AppError> {
    let key: ScheduleKey = request.input()?;
    ScheduleService::get_schedule(state, request.bearer_token().as_deref(), key).await
}

pub async fn list_schedules(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<ScheduleList, AppError> {
    let query: ListSchedulesQuery = request.input()?;
    ScheduleService::list_schedules(state, request.bearer_token().as_deref(), query).await
}

pub async fn update_schedule(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<UpdateScheduleResponse, AppError> {
    let key: ScheduleKey = request.input()?;
    let dto: UpdateScheduleDto = request.input()?;
    ScheduleService::update_schedule(state, request.bearer_token().as_deref(), key, dto).await
}

pub async fn delete_schedule(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<MessageResponse, AppError> {
    let key: ScheduleKey = request.input()?;
    ScheduleService::delete_schedule(state, request.bearer_token().as_deref(), key).await
}
