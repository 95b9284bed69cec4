//! Uniform request and response envelopes.
//!
//! Every Atrium function accepts a [`RequestEnvelope`] and produces a
//! [`ResponseEnvelope`]. Over HTTP the envelope is posted to `/invoke/{function}`;
//! the REST routes translate axum extractors into the same service calls.
//!
//! ```json
//! {
//!   "path": "/users",
//!   "query": { "tenant_id": "acme", "role": "client" },
//!   "headers": { "Authorization": "Bearer 2b0c..." },
//!   "body": { "dni": "12345678" }
//! }
//! ```
//!
//! Bodies may be JSON objects or JSON documents encoded as strings.

use std::collections::BTreeMap;

use anyhow::anyhow;
use axum::{
    Json,
    body::Body,
    extract::{FromRequest, Request},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use data_encoding::BASE64;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::AppError;
use crate::serde::null_as_default;
use crate::validator::parse_validated;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequestEnvelope {
    #[serde(default, alias = "rawPath")]
    pub path: String,
    #[serde(
        default,
        alias = "queryStringParameters",
        deserialize_with = "null_as_default"
    )]
    pub query: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub body: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.insert(key.to_string(), value.into());
        self
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_string(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Session token from the `Authorization` header, with or without a `Bearer ` prefix.
    pub fn bearer_token(&self) -> Option<String> {
        self.header(header::AUTHORIZATION.as_str())
            .and_then(parse_authorization)
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Raw JSON body; string bodies are parsed as JSON documents.
    pub fn json_value(&self) -> Result<Value, AppError> {
        match &self.body {
            None | Some(Value::Null) => Ok(Value::Object(Map::new())),
            Some(Value::String(raw)) if raw.trim().is_empty() => Ok(Value::Object(Map::new())),
            Some(Value::String(raw)) => serde_json::from_str(raw)
                .map_err(|_| AppError::bad_request(anyhow!("Invalid request body"))),
            Some(other) => Ok(other.clone()),
        }
    }

    pub fn json_body<T>(&self) -> Result<T, AppError>
    where
        T: DeserializeOwned + Validate,
    {
        parse_validated(self.json_value()?)
    }

    /// Function input: query parameters overlaid with the body's fields.
    ///
    /// Body fields win over query parameters of the same name. A body that is
    /// not a JSON object contributes nothing.
    pub fn input<T>(&self) -> Result<T, AppError>
    where
        T: DeserializeOwned + Validate,
    {
        let mut merged = self
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Map<_, _>>();
        if let Value::Object(body) = self.json_value()? {
            merged.extend(body);
        }
        parse_validated(Value::Object(merged))
    }

    /// Query parameters as a validated struct.
    pub fn query_as<T>(&self) -> Result<T, AppError>
    where
        T: DeserializeOwned + Validate,
    {
        let map = self
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Map<_, _>>();
        parse_validated(Value::Object(map))
    }
}

/// Accepts `Bearer <token>` or a bare token.
/// A bare `Bearer` scheme with nothing after it carries no token.
pub fn parse_authorization(value: &str) -> Option<String> {
    let value = value.trim_start();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        None if value.trim_end().eq_ignore_ascii_case("bearer") => "",
        _ => value,
    }
    .trim();

    (!token.is_empty()).then(|| token.to_string())
}

impl<S> FromRequest<S> for RequestEnvelope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(envelope) = Json::<RequestEnvelope>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(anyhow!("Invalid envelope: {}", rejection.body_text()))
            })?;

        Ok(envelope)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub body: Value,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_base64_encoded: bool,
}

impl ResponseEnvelope {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status_code: status.as_u16(),
            body,
            headers: BTreeMap::new(),
            is_base64_encoded: false,
        }
    }

    /// 200 with any serializable body.
    pub fn ok<T: Serialize>(body: &T) -> Result<Self, AppError> {
        Ok(Self::json(StatusCode::OK, serde_json::to_value(body)?))
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::json(status, Value::String(body.into()))
    }

    pub fn binary(status: StatusCode, bytes: &[u8]) -> Self {
        Self {
            is_base64_encoded: true,
            ..Self::text(status, BASE64.encode(bytes))
        }
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_string(), value.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// Message of an error envelope, if the body carries one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    fn body_bytes(&self) -> Result<(Vec<u8>, &'static str), AppError> {
        match &self.body {
            Value::String(text) if self.is_base64_encoded => {
                let bytes = BASE64
                    .decode(text.as_bytes())
                    .map_err(|e| AppError::internal(anyhow!("Invalid base64 body: {}", e)))?;
                Ok((bytes, "application/octet-stream"))
            }
            Value::String(text) => Ok((text.clone().into_bytes(), "text/plain; charset=utf-8")),
            other => Ok((serde_json::to_vec(other)?, "application/json")),
        }
    }
}

impl From<AppError> for ResponseEnvelope {
    fn from(err: AppError) -> Self {
        err.log();
        ResponseEnvelope::json(err.status, err.body())
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let (bytes, default_type) = match self.body_bytes() {
            Ok(parts) => parts,
            Err(err) => return err.into_response(),
        };

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = self.status();

        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(default_type));
        for (key, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }

        response
    }
}

/// Envelope for a handler result, folding errors into their status code.
pub fn into_envelope<T: Serialize>(result: Result<T, AppError>) -> ResponseEnvelope {
    result
        .and_then(|value| ResponseEnvelope::ok(&value))
        .unwrap_or_else(ResponseEnvelope::from)
}

/// Error envelope used when no function matches the invoked name.
pub fn unknown_function(name: &str) -> ResponseEnvelope {
    ResponseEnvelope::json(
        StatusCode::NOT_FOUND,
        json!({ "error": format!("Unknown function: {}", name) }),
    )
}
