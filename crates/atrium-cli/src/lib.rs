//! # Atrium CLI
//!
//! Administrative commands and store seeding for Atrium.
//!
//! ## Usage
//!
//! ```ignore
//! use atrium_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(10); // 10 organizations with defaults
//! seed_all(&stores, config).await?;
//! ```

pub mod admin;
pub mod seeder;

use std::sync::Arc;

use atrium_config::{StoreBackend, StoreConfig};
use atrium_db::{CredentialStore, KeyValueStore, OrganizationStore, StoreError, connect_store};

/// Typed stores the commands write through.
#[derive(Clone, Debug)]
pub struct Stores {
    pub organizations: OrganizationStore,
    pub credentials: CredentialStore,
}

impl Stores {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        Self {
            organizations: OrganizationStore::new(store.clone(), &config.tables),
            credentials: CredentialStore::new(store, &config.tables),
        }
    }

    /// PostgreSQL store from `DATABASE_URL`, whatever `STORE_BACKEND` says.
    pub async fn connect() -> Result<Self, StoreError> {
        let config = StoreConfig {
            backend: StoreBackend::Postgres,
            ..StoreConfig::from_env()
        };
        let store = connect_store(&config).await?;
        Ok(Self::new(store, &config))
    }
}
