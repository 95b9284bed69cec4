use tracing::{info, instrument};

use atrium_core::envelope::{into_envelope, unknown_function};
use atrium_core::{RequestEnvelope, ResponseEnvelope};
use atrium_observability::track_function_invoked;

use crate::modules::{auth, courses, doc_viewer, organizations, purchases, schedules, users};
use crate::state::AppState;

/// Names accepted by [`FunctionService::invoke`].
pub const FUNCTION_NAMES: &[&str] = &[
    "create-organization",
    "get-organization",
    "list-organizations",
    "update-organization",
    "create-user",
    "get-user",
    "list-users",
    "login",
    "logout",
    "validate-token",
    "create-course",
    "get-course",
    "list-courses",
    "update-course",
    "delete-course",
    "create-schedule",
    "get-schedule",
    "list-schedules",
    "update-schedule",
    "delete-schedule",
    "create-purchase",
    "list-purchases",
    "update-purchases",
    "delete-purchase",
    "doc",
];

pub struct FunctionService;

impl FunctionService {
    /// Runs one function against the envelope. Failures are folded into the
    /// returned envelope's `statusCode`.
    #[instrument(skip(state, request), fields(function = %name))]
    pub async fn invoke(state: &AppState, name: &str, request: &RequestEnvelope) -> ResponseEnvelope {
        let response = match name {
            "create-organization" => {
                into_envelope(organizations::functions::create_organization(state, request).await)
            }
            "get-organization" => {
                into_envelope(organizations::functions::get_organization(state, request).await)
            }
            "list-organizations" => {
                into_envelope(organizations::functions::list_organizations(state, request).await)
            }
            "update-organization" => {
                into_envelope(organizations::functions::update_organization(state, request).await)
            }
            "create-user" => into_envelope(users::functions::create_user(state, request).await),
            "get-user" => into_envelope(users::functions::get_user(state, request).await),
            "list-users" => into_envelope(users::functions::list_users(state, request).await),
            "login" => into_envelope(auth::functions::login(state, request).await),
            "logout" => into_envelope(auth::functions::logout(state, request).await),
            "validate-token" => into_envelope(auth::functions::validate_token(state, request).await),
            "create-course" => into_envelope(courses::functions::create_course(state, request).await),
            "get-course" => into_envelope(courses::functions::get_course(state, request).await),
            "list-courses" => into_envelope(courses::functions::list_courses(state, request).await),
            "update-course" => into_envelope(courses::functions::update_course(state, request).await),
            "delete-course" => into_envelope(courses::functions::delete_course(state, request).await),
            "create-schedule" => {
                into_envelope(schedules::functions::create_schedule(state, request).await)
            }
            "get-schedule" => into_envelope(schedules::functions::get_schedule(state, request).await),
            "list-schedules" => {
                into_envelope(schedules::functions::list_schedules(state, request).await)
            }
            "update-schedule" => {
                into_envelope(schedules::functions::update_schedule(state, request).await)
            }
            "delete-schedule" => {
                into_envelope(schedules::functions::delete_schedule(state, request).await)
            }
            "create-purchase" => {
                into_envelope(purchases::functions::create_purchase(state, request).await)
            }
            "list-purchases" => {
                into_envelope(purchases::functions::list_purchases(state, request).await)
            }
            "update-purchases" => {
                into_envelope(purchases::functions::update_purchases(state, request).await)
            }
            "delete-purchase" => {
                into_envelope(purchases::functions::delete_purchase(state, request).await)
            }
            "doc" => doc_viewer::functions::view_doc(state, request).await,
            other => unknown_function(other),
        };

        let label = if FUNCTION_NAMES.contains(&name) { name } else { "unknown" };
        track_function_invoked(label, response.status_code);
        info!(status = response.status_code, "Function invoked");
        response
    }
}
