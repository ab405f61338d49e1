#![warn(missing_docs)]
//! Privilege evaluation and hot-reloadable policy for the catalog cache's authorization surface.

pub mod checker;
pub mod config;
pub mod policy;
pub mod privilege;
pub mod reloader;

pub use checker::AuthorizationChecker;
pub use config::AuthorizationConfig;
pub use policy::{Policy, PolicyGrant};
pub use privilege::{Privilege, PrivilegeRequest, Scope};
pub use reloader::{spawn_policy_reloader, AuthorizationHandle};

/// The error taxonomy of the authorization surface (§7).
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum AuthorizationError {
    #[error("{principal} does not have privileges to access {scope}")]
    AccessDenied { principal: String, scope: String },

    #[error("{principal} does not have privileges to execute {privilege} on {scope}")]
    ActionDenied { principal: String, privilege: String, scope: String },

    #[error(transparent)]
    Config(#[from] catalog_config::ConfigError),
}
