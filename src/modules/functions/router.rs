use axum::{Router, routing::post};

use super::controller::invoke_function;
use crate::state::AppState;

pub fn init_functions_router() -> Router<AppState> {
    Router::new().route("/{function}", post(invoke_function))
}
