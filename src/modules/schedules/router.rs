use axum::{Router, routing::get};

use super::controller::{
    create_schedule, delete_schedule, get_schedule, list_schedules, update_schedule,
};
use crate::state::AppState;

pub fn init_schedules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route(
            "/{tenant_id}/{course_id}/{schedule_id}",
            get(get_schedule).patch(update_schedule).delete(delete_schedule),
        )
}
