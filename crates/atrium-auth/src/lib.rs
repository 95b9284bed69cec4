//! # Atrium Auth
//!
//! Session tokens and role-based authorization for the Atrium API.
//!
//! This crate provides:
//!
//! - [`TokenService`]: issues, validates and revokes opaque session tokens
//! - [`TokenValidator`]: the seam through which tokens are validated, either
//!   in-process or by invoking the `validate-token` function remotely
//! - [`AuthorizationDelegate`]: validates a token and gates access by role
//! - [`Clock`]: injectable time source for expiry checks
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use atrium_auth::{AuthorizationDelegate, TokenService};
//! use atrium_models::UserRole;
//!
//! let tokens = TokenService::new(credentials, digest, &token_config);
//! let session = tokens.issue("acme", "100", None, "s3cret").await?;
//!
//! let delegate = AuthorizationDelegate::new(Arc::new(tokens));
//! let claim = delegate
//!     .authorize(Some(&session.token.to_string()), Some("acme"), &[UserRole::Admin])
//!     .await?;
//! ```

pub mod clock;
pub mod delegate;
pub mod error;
pub mod token_service;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delegate::AuthorizationDelegate;
pub use error::AuthError;
pub use token_service::TokenService;
pub use validator::TokenValidator;
