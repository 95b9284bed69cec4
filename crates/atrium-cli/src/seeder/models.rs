//! Seed data and seeding configuration.

use atrium_models::UserRole;

/// Generated organization, before a port is assigned.
pub struct OrganizationSeed {
    pub tenant_id: String,
    pub domain: String,
    pub description: String,
    pub email: String,
}

/// Generated user; every seeded user shares one password digest.
pub struct UserSeed {
    pub tenant_id: String,
    pub dni: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Users created for each organization, besides its admin.
#[derive(Clone, Debug)]
pub struct UsersPerOrganization {
    pub instructors: usize,
    pub clients: usize,
}

impl Default for UsersPerOrganization {
    fn default() -> Self {
        Self {
            instructors: 3,
            clients: 20,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub organizations: usize,
    pub users: UsersPerOrganization,
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            organizations: 5,
            users: UsersPerOrganization::default(),
            password: "password123".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn new(organizations: usize) -> Self {
        Self {
            organizations,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: UsersPerOrganization) -> Self {
        self.users = users;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Admin included.
    pub fn users_per_organization(&self) -> usize {
        1 + self.users.instructors + self.users.clients
    }
}

/// What a seeding run actually wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub organizations: usize,
    pub users: usize,
    pub skipped: usize,
}
