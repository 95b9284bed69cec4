use std::env;
use std::path::PathBuf;

/// Root directory served under `/doc`.
#[derive(Clone, Debug)]
pub struct DocsConfig {
    pub root: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("doc"),
        }
    }
}

impl DocsConfig {
    pub fn from_env() -> Self {
        env::var("DOCS_ROOT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|root| Self {
                root: PathBuf::from(root),
            })
            .unwrap_or_default()
    }
}
