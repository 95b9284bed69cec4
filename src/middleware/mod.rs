//! Request extractors and authorization helpers.
//!
//! - [`auth::BearerToken`]: pulls the session token out of `Authorization`
//! - [`auth::require_role`]: validates the token for a tenant and gates by role
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{BearerToken, require_role};
//!
//! async fn handler(State(state): State<AppState>, token: BearerToken) -> Result<_, AppError> {
//!     let claim = require_role(&state, token.as_deref(), "acme", &[UserRole::Admin]).await?;
//!     // claim.tenant_id scopes every following query
//! }
//! ```

pub mod auth;
