//! Envelope entry points for the user functions.

use atrium_core::{AppError, RequestEnvelope};
use atrium_models::{CreateUserDto, CreateUserResponse, GetUserQuery, ListUsersQuery, User, UserList};

use super::service::UserService;
use crate::state::AppState;

pub async fn create_user(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<CreateUserResponse, AppError> {
    let dto: CreateUserDto = request.input()?;
    let token = request.bearer_token();
    UserService::create_user(state, token.as_deref(), dto).await
}

pub async fn get_user(state: &AppState, request: &RequestEnvelope) -> Result<User, AppError> {
    let query: GetUserQuery = request.input()?;
    UserService::get_user(state, query).await
}

pub async fn list_users(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<UserList, AppError> {
    let query: ListUsersQuery = request.input()?;
    let token = request.bearer_token();
    UserService::list_users(state, token.as_deref(), query).await
}
