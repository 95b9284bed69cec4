use std::sync::Arc;

use atrium_auth::{AuthorizationDelegate, Clock, SystemClock, TokenService, TokenValidator};
use atrium_config::{AppConfig, CorsConfig, DocsConfig};
use atrium_core::{AppError, digest_from_name};
use atrium_db::{
    CourseStore, CredentialStore, KeyValueStore, OrganizationStore, PurchaseStore, ScheduleStore,
    connect_store,
};
use tracing::info;

use crate::collaborators::{
    FunctionClient, HttpProvisioner, LocalOrganizationDirectory, NoopProvisioner,
    OrganizationDirectory, Provisioner, RemoteOrganizationDirectory, RemoteTokenValidator,
};

/// Collaborators injected into [`AppState`]. `None` means "in-process".
#[derive(Clone, Debug)]
pub struct Collaborators {
    pub validator: Option<Arc<dyn TokenValidator>>,
    pub directory: Option<Arc<dyn OrganizationDirectory>>,
    pub provisioner: Arc<dyn Provisioner>,
    pub clock: Arc<dyn Clock>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            validator: None,
            directory: None,
            provisioner: Arc::new(NoopProvisioner),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Collaborators {
    /// Remote implementations where the configuration names an endpoint.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let settings = &config.collaborators;
        let mut collaborators = Self::default();

        if let Some(base_url) = &settings.function_base_url {
            let client = FunctionClient::new(base_url.clone(), settings)?;
            info!(base_url = %base_url, "Using remote token validation and organization lookup");
            collaborators.validator = Some(Arc::new(RemoteTokenValidator::new(
                client.clone(),
                settings.validate_function.clone(),
            )));
            collaborators.directory = Some(Arc::new(RemoteOrganizationDirectory::new(
                client,
                settings.organization_function.clone(),
            )));
        }

        if let Some(url) = &settings.provisioning_url {
            collaborators.provisioner = Arc::new(HttpProvisioner::new(url.clone(), settings)?);
        }

        Ok(collaborators)
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub organizations: OrganizationStore,
    pub credentials: CredentialStore,
    pub courses: CourseStore,
    pub schedules: ScheduleStore,
    pub purchases: PurchaseStore,
    pub tokens: TokenService,
    pub delegate: AuthorizationDelegate,
    pub directory: Arc<dyn OrganizationDirectory>,
    pub provisioner: Arc<dyn Provisioner>,
    pub cors_config: CorsConfig,
    pub docs_config: DocsConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        config: &AppConfig,
        collaborators: Collaborators,
    ) -> Result<Self, AppError> {
        let tables = &config.store.tables;
        let organizations = OrganizationStore::new(store.clone(), tables);
        let credentials = CredentialStore::new(store.clone(), tables);
        let courses = CourseStore::new(store.clone(), tables);
        let schedules = ScheduleStore::new(store.clone(), tables);
        let purchases = PurchaseStore::new(store, tables);

        let digest = digest_from_name(&config.token.password_digest)?;
        let tokens = TokenService::new(credentials.clone(), digest, &config.token)
            .with_clock(collaborators.clock);

        let validator = collaborators
            .validator
            .unwrap_or_else(|| Arc::new(tokens.clone()));
        let directory = collaborators.directory.unwrap_or_else(|| {
            Arc::new(LocalOrganizationDirectory::new(organizations.clone()))
        });

        Ok(Self {
            organizations,
            credentials,
            courses,
            schedules,
            purchases,
            tokens,
            delegate: AuthorizationDelegate::new(validator),
            directory,
            provisioner: collaborators.provisioner,
            cors_config: config.cors.clone(),
            docs_config: config.docs.clone(),
        })
    }
}

pub async fn init_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    let store = connect_store(&config.store).await?;
    AppState::new(store, config, Collaborators::from_config(config)?)
}
