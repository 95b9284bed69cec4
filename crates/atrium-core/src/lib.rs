//! # Atrium Core
//!
//! Core types, errors, and utilities shared by every Atrium crate.
//!
//! - [`errors`]: Application error type with HTTP and envelope conversion
//! - [`envelope`]: Uniform request/response envelopes used by every handler
//! - [`pagination`]: Cursor pagination parameters
//! - [`password`]: Pluggable one-way password digests
//! - [`serde`]: Custom serde helpers for query strings
//! - [`validator`]: Validated JSON extraction and detail checks
//!
//! # Example
//!
//! ```ignore
//! use atrium_core::errors::AppError;
//! use atrium_core::password::{PasswordDigest, Sha256Digest};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Organization not found"));
//!
//! let digest = Sha256Digest;
//! let stored = digest.digest("secure_password")?;
//! assert!(digest.verify("secure_password", &stored)?);
//! ```

pub mod envelope;
pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;
pub mod validator;

pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use errors::AppError;
pub use pagination::{CursorPage, clamp_limit};
pub use password::{BcryptDigest, DigestError, PasswordDigest, Sha256Digest, digest_from_name};
pub use validator::{ValidatedJson, ValidatedQuery};
