//! Application error type.
//!
//! Every handler returns `Result<_, AppError>`. The status code travels with the
//! error so the same value can be rendered as an axum response or folded into a
//! [`ResponseEnvelope`](crate::envelope::ResponseEnvelope) for function invocations.
//!
//! | Constructor      | Status |
//! |------------------|--------|
//! | `bad_request`    | 400    |
//! | `unauthorized`   | 401    |
//! | `forbidden`      | 403    |
//! | `not_found`      | 404    |
//! | `conflict`       | 409    |
//! | `internal`       | 500    |
//! | `unavailable`    | 503    |

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::validator::format_errors;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, err)
    }

    /// JSON body rendered for this error.
    ///
    /// Internal errors keep a fixed message and move the cause to `detail`.
    pub fn body(&self) -> Value {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            json!({
                "error": "Internal server error",
                "detail": format!("{:#}", self.error),
            })
        } else {
            json!({ "error": self.error.to_string() })
        }
    }

    pub(crate) fn log(&self) {
        if self.status.is_server_error() {
            tracing::error!(
                http.status = self.status.as_u16(),
                error = ?self.error,
                "Request failed with server error"
            );
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.error, self.status)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        (self.status, Json(self.body())).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::bad_request(anyhow::anyhow!("{}", format_errors(&errors)))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use http_body_util::BodyExt;

    #[test]
    fn test_constructors_set_status() {
        assert_eq!(AppError::bad_request(anyhow!("x")).status, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthorized(anyhow!("x")).status, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden(anyhow!("x")).status, StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found(anyhow!("x")).status, StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict(anyhow!("x")).status, StatusCode::CONFLICT);
        assert_eq!(
            AppError::internal(anyhow!("x")).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::unavailable(anyhow!("x")).status,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_client_error_body_carries_message() {
        let err = AppError::conflict(anyhow!("Organization already exists"));
        assert_eq!(err.body(), json!({ "error": "Organization already exists" }));
    }

    #[test]
    fn test_internal_error_body_hides_message_in_detail() {
        let err = AppError::internal(anyhow!("connection reset"));
        let body = err.body();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["detail"], "connection reset");
    }

    #[tokio::test]
    async fn test_into_response_uses_status_and_json_body() {
        let response = AppError::not_found(anyhow!("User not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "User not found");
    }
}
