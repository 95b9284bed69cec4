//! Collaborators reached through trait seams: token validation, organization
//! lookup and provisioning. Each has an in-process implementation and one that
//! goes over HTTP.

pub mod error;
pub mod invoke;
pub mod organizations;
pub mod provisioning;
pub mod token_validator;

pub use error::CollaboratorError;
pub use invoke::FunctionClient;
pub use organizations::{
    LocalOrganizationDirectory, OrganizationDirectory, RemoteOrganizationDirectory,
};
pub use provisioning::{HttpProvisioner, NoopProvisioner, Provisioner};
pub use token_validator::RemoteTokenValidator;
