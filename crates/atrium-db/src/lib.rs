//! # Atrium DB
//!
//! Key-value storage for Atrium.
//!
//! The services never talk to a database directly. They go through the
//! [`KeyValueStore`] trait (get / put / conditional put / update / delete /
//! partition query / scan / atomic increment) and the typed adapters built on
//! top of it:
//!
//! - [`CredentialStore`]: users, session tokens and the per-tenant admin slot
//! - [`OrganizationStore`]: organizations and the port counter
//! - [`CourseStore`]: tenant-scoped courses
//! - [`ScheduleStore`]: weekly time slots of a course
//! - [`PurchaseStore`]: client reservations and enrollments
//!
//! Two backends are provided: [`MemoryStore`] for local runs and tests, and
//! [`PgStore`] which keeps every logical table in one PostgreSQL relation.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use atrium_config::StoreConfig;
//! use atrium_db::{CredentialStore, MemoryStore};
//!
//! let config = StoreConfig::from_env();
//! let store = Arc::new(MemoryStore::new());
//! let credentials = CredentialStore::new(store, &config.tables);
//! ```

pub mod courses;
pub mod credentials;
pub mod memory;
pub mod organizations;
pub mod postgres;
pub mod purchases;
pub mod schedules;
pub mod store;

use std::sync::Arc;

use atrium_config::{StoreBackend, StoreConfig};
use tracing::info;

pub use courses::CourseStore;
pub use credentials::CredentialStore;
pub use memory::MemoryStore;
pub use organizations::OrganizationStore;
pub use postgres::{PgStore, init_db_pool};
pub use purchases::PurchaseStore;
pub use schedules::ScheduleStore;
pub use store::{Item, ItemKey, KeyValueStore, Query, StoreError};

/// Builds the configured backend, running migrations for PostgreSQL.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory key-value store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = init_db_pool(config.database_url.as_deref()).await?;
            let store = PgStore::new(pool);
            store.migrate().await?;
            info!("Using PostgreSQL key-value store");
            Ok(Arc::new(store))
        }
    }
}
