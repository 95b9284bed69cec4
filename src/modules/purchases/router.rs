use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_purchase, delete_purchase, list_purchases, refresh_purchases};
use crate::state::AppState;

pub fn init_purchases_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_purchases)
                .post(create_purchase)
                .patch(refresh_purchases),
        )
        .route("/{tenant_id}/{course_id}", delete(delete_purchase))
}
