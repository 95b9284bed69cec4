//! Storage configuration.
//!
//! - `STORE_BACKEND`: `memory` (default) or `postgres`
//! - `DATABASE_URL`: required for the `postgres` backend
//! - `TABLE_ORG`, `TABLE_USER`, `TABLE_TOKEN`, `TABLE_COUNTER`, `TABLE_COURSE`,
//!   `TABLE_SCHEDULE`, `TABLE_PURCHASE`: logical table names inside the
//!   key-value store

use std::env;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableNames {
    pub organizations: String,
    pub users: String,
    pub tokens: String,
    pub counters: String,
    pub courses: String,
    pub schedules: String,
    pub purchases: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            organizations: "organizations".to_string(),
            users: "users".to_string(),
            tokens: "tokens".to_string(),
            counters: "counters".to_string(),
            courses: "courses".to_string(),
            schedules: "schedules".to_string(),
            purchases: "purchases".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub tables: TableNames,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TableNames::default();
        let table = |key: &str, default: String| {
            lookup(key)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default)
        };

        Self {
            backend: lookup("STORE_BACKEND")
                .and_then(|v| StoreBackend::parse(&v))
                .unwrap_or_default(),
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            tables: TableNames {
                organizations: table("TABLE_ORG", defaults.organizations),
                users: table("TABLE_USER", defaults.users),
                tokens: table("TABLE_TOKEN", defaults.tokens),
                counters: table("TABLE_COUNTER", defaults.counters),
                courses: table("TABLE_COURSE", defaults.courses),
                schedules: table("TABLE_SCHEDULE", defaults.schedules),
                purchases: table("TABLE_PURCHASE", defaults.purchases),
            },
        }
    }
}
