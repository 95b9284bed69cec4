//! One-way password digests.
//!
//! Stored credentials only ever hold the output of a [`PasswordDigest`]. The
//! default is a hex encoded SHA-256, compatible with records written by the
//! function deployment; bcrypt can be selected with `PASSWORD_DIGEST=bcrypt`.

use std::fmt::Debug;
use std::sync::Arc;

use bcrypt::DEFAULT_COST;
use sha2::{Digest, Sha256};

use crate::errors::AppError;

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("unknown password digest: {0}")]
    UnknownAlgorithm(String),
}

impl From<DigestError> for AppError {
    fn from(err: DigestError) -> Self {
        AppError::internal(err)
    }
}

pub trait PasswordDigest: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn digest(&self, password: &str) -> Result<String, DigestError>;

    fn verify(&self, password: &str, stored: &str) -> Result<bool, DigestError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl PasswordDigest for Sha256Digest {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest(&self, password: &str) -> Result<String, DigestError> {
        Ok(hex::encode(Sha256::digest(password.as_bytes())))
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, DigestError> {
        let computed = self.digest(password)?;
        if computed.len() != stored.len() {
            return Ok(false);
        }
        // constant time over equal-length inputs
        let diff = computed
            .bytes()
            .zip(stored.to_ascii_lowercase().bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        Ok(diff == 0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptDigest {
    pub cost: u32,
}

impl Default for BcryptDigest {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordDigest for BcryptDigest {
    fn name(&self) -> &'static str {
        "bcrypt"
    }

    fn digest(&self, password: &str) -> Result<String, DigestError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, DigestError> {
        Ok(bcrypt::verify(password, stored)?)
    }
}

/// Resolves a digest by its configuration name (`sha256` or `bcrypt`).
pub fn digest_from_name(name: &str) -> Result<Arc<dyn PasswordDigest>, DigestError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "sha256" => Ok(Arc::new(Sha256Digest)),
        "bcrypt" => Ok(Arc::new(BcryptDigest::default())),
        other => Err(DigestError::UnknownAlgorithm(other.to_string())),
    }
}
