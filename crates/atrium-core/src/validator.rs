use anyhow::anyhow;
use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

pub fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().filter_map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .or_else(|| Some(format!("{} is invalid", field)))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maps a serde error message to a client-facing 400.
fn body_error(message: &str) -> AppError {
    if message.contains("missing field") {
        let field = message
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    if message.contains("unknown variant") {
        return AppError::bad_request(anyhow!("{}", message));
    }

    if message.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

/// Deserializes and validates a JSON value taken from an envelope body or query map.
pub fn parse_validated<T>(value: Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(value).map_err(|e| body_error(&e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Rejects a `detail` attribute that is present but not a JSON object.
pub fn ensure_object(field: &str, value: Option<&Value>) -> Result<(), AppError> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(AppError::bad_request(anyhow!(
            "{} must be a JSON object",
            field
        ))),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ));
                }

                body_error(&rejection.body_text())
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor with the same error messages as [`ValidatedJson`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::bad_request(anyhow!("Invalid query string")))?;

        let map = params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<_, _>>();

        Ok(ValidatedQuery(parse_validated(Value::Object(map))?))
    }
}
