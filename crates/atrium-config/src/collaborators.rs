//! Sibling function endpoints.
//!
//! When `FUNCTION_BASE_URL` is unset, token validation and organization lookup
//! run in-process. When it is set, they are invoked over HTTP as
//! `POST {FUNCTION_BASE_URL}/invoke/{name}` with a request envelope.
//!
//! - `FUNCTION_VALIDAR`: validation function name (default: `validate-token`)
//! - `FUNCTION_ORG`: organization lookup function name (default: `get-organization`)
//! - `PROVISIONING_URL`: optional endpoint notified after an organization is created
//! - `COLLABORATOR_TIMEOUT_SECS`: per-call timeout (default: 10)

use std::env;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollaboratorConfig {
    pub function_base_url: Option<String>,
    pub validate_function: String,
    pub organization_function: String,
    pub provisioning_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            function_base_url: None,
            validate_function: "validate-token".to_string(),
            organization_function: "get-organization".to_string(),
            provisioning_url: None,
            timeout_secs: 10,
        }
    }
}

impl CollaboratorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        Self {
            function_base_url: non_empty("FUNCTION_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            validate_function: non_empty("FUNCTION_VALIDAR").unwrap_or(defaults.validate_function),
            organization_function: non_empty("FUNCTION_ORG")
                .unwrap_or(defaults.organization_function),
            provisioning_url: non_empty("PROVISIONING_URL"),
            timeout_secs: non_empty("COLLABORATOR_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_remote(&self) -> bool {
        self.function_base_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_by_default() {
        let config = CollaboratorConfig::from_lookup(|_| None);
        assert!(!config.is_remote());
        assert_eq!(config.validate_function, "validate-token");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = CollaboratorConfig::from_lookup(|k| {
            (k == "FUNCTION_BASE_URL").then(|| "http://functions.local/".into())
        });
        assert!(config.is_remote());
        assert_eq!(
            config.function_base_url.as_deref(),
            Some("http://functions.local")
        );
    }
}
