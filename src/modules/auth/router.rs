use axum::{Router, routing::post};

use super::controller::{login_user, logout_user, validate_token};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/validate", post(validate_token))
}
