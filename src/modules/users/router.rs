use axum::{Router, routing::get};

use super::controller::{create_user, get_user, list_users};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{tenant_id}/{role}/{dni}", get(get_user))
}
