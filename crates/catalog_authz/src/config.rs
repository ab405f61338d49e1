//! Configuration for the authorization surface: where the policy file lives, whether enforcement
//! is on, and how often the policy is reloaded.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::BTreeMap;
use std::path::PathBuf;

use catalog_config::dumping::{ser_param, SerializeConfig};
use catalog_config::validators::validate_path_exists;
use catalog_config::{loading, ConfigError, ParamPath, SerializedParam};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration for [`crate::reloader`] and [`crate::checker::AuthorizationChecker`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Validate)]
pub struct AuthorizationConfig {
    /// Path to the JSON policy file.
    #[validate(custom = "validate_path_exists")]
    pub policy_file: PathBuf,
    /// Whether authorization is enforced at all; when false, every check passes.
    pub enabled: bool,
    /// The name this server identifies as, used in audit messages.
    pub server_name: String,
    /// Base reload interval, in seconds (default 300 per §4.5).
    pub reload_interval_secs: u64,
    /// Upper (exclusive) bound of the uniform random jitter added to the reload interval to
    /// decorrelate nodes (default 60 per §4.5).
    pub reload_jitter_secs: u64,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        AuthorizationConfig {
            policy_file: PathBuf::from("policy.json"),
            enabled: true,
            server_name: "impalad".to_string(),
            reload_interval_secs: 300,
            reload_jitter_secs: 60,
        }
    }
}

impl SerializeConfig for AuthorizationConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        BTreeMap::from([
            ser_param("policy_file", &self.policy_file, "Path to the JSON authorization policy file."),
            ser_param("enabled", &self.enabled, "Whether authorization is enforced."),
            ser_param("server_name", &self.server_name, "This server's name, used in audit messages."),
            ser_param(
                "reload_interval_secs",
                &self.reload_interval_secs,
                "Base interval, in seconds, between policy reloads.",
            ),
            ser_param(
                "reload_jitter_secs",
                &self.reload_jitter_secs,
                "Upper (exclusive) bound of the per-process random jitter added to the reload interval.",
            ),
        ])
    }
}

impl AuthorizationConfig {
    /// Loads the config from `path`, applying environment overrides for every field (named
    /// `CATALOG_AUTHZ_<FIELD>`), then validates it.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config: AuthorizationConfig = loading::load_with_env_overrides(
            path,
            &[
                ("policy_file", "CATALOG_AUTHZ_POLICY_FILE"),
                ("enabled", "CATALOG_AUTHZ_ENABLED"),
                ("server_name", "CATALOG_AUTHZ_SERVER_NAME"),
                ("reload_interval_secs", "CATALOG_AUTHZ_RELOAD_INTERVAL_SECS"),
                ("reload_jitter_secs", "CATALOG_AUTHZ_RELOAD_JITTER_SECS"),
            ],
        )?;
        catalog_config::validators::config_validate(&config)?;
        Ok(config)
    }
}
