use axum::{Router, routing::get};

use super::controller::{
    create_organization, get_organization, list_organizations, update_organization,
};
use crate::state::AppState;

pub fn init_organizations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route(
            "/{tenant_id}",
            get(get_organization).patch(update_organization),
        )
}
