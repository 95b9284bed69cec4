use std::env;

/// Session token settings.
///
/// - `TOKEN_TTL_SECONDS`: lifetime of a login session (default: 3600)
/// - `PASSWORD_DIGEST`: `sha256` (default) or `bcrypt`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenConfig {
    pub ttl_seconds: i64,
    pub password_digest: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            password_digest: "sha256".to_string(),
        }
    }
}

impl TokenConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            ttl_seconds: lookup("TOKEN_TTL_SECONDS")
                .and_then(|s| s.parse().ok())
                .filter(|ttl: &i64| *ttl > 0)
                .unwrap_or(defaults.ttl_seconds),
            password_digest: lookup("PASSWORD_DIGEST")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.password_digest),
        }
    }
}
