use axum::{
    Json,
    extract::{Path, State},
};

use atrium_core::{RequestEnvelope, ResponseEnvelope};

use super::service::FunctionService;
use crate::docs::ErrorResponse;
use crate::state::AppState;

/// Invoke a function with a request envelope
///
/// Always answers 200 once the envelope parses; the function's own status is
/// `statusCode` in the returned envelope.
#[utoipa::path(
    post,
    path = "/invoke/{function}",
    params(("function" = String, Path, description = "Function name, e.g. `validate-token`")),
    request_body = RequestEnvelope,
    responses(
        (status = 200, description = "Response envelope", body = ResponseEnvelope),
        (status = 400, description = "Malformed envelope", body = ErrorResponse)
    ),
    tag = "Functions"
)]
pub async fn invoke_function(
    State(state): State<AppState>,
    Path(function): Path<String>,
    request: RequestEnvelope,
) -> Json<ResponseEnvelope> {
    Json(FunctionService::invoke(&state, &function, &request).await)
}
