//! # Atrium Config
//!
//! Configuration types for Atrium, loaded from environment variables.
//!
//! - [`store`]: Storage backend and table names
//! - [`token`]: Session lifetime and password digest selection
//! - [`collaborators`]: Sibling function endpoints and provisioning hook
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`docs`]: Static documentation root
//! - [`server`]: Listener address
//!
//! # Example
//!
//! ```ignore
//! use atrium_config::{StoreConfig, TokenConfig, CollaboratorConfig};
//!
//! let store_config = StoreConfig::from_env();
//! let token_config = TokenConfig::from_env();
//! let collaborator_config = CollaboratorConfig::from_env();
//!
//! // or everything at once
//! let config = atrium_config::AppConfig::from_env();
//! ```

pub mod collaborators;
pub mod cors;
pub mod docs;
pub mod server;
pub mod store;
pub mod token;

pub use collaborators::CollaboratorConfig;
pub use cors::CorsConfig;
pub use docs::DocsConfig;
pub use server::ServerConfig;
pub use store::{StoreBackend, StoreConfig, TableNames};
pub use token::TokenConfig;

/// Every configuration section the server needs.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub token: TokenConfig,
    pub collaborators: CollaboratorConfig,
    pub cors: CorsConfig,
    pub docs: DocsConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            store: StoreConfig::from_env(),
            token: TokenConfig::from_env(),
            collaborators: CollaboratorConfig::from_env(),
            cors: CorsConfig::from_env(),
            docs: DocsConfig::from_env(),
            server: ServerConfig::from_env(),
        }
    }
}
