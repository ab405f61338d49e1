#![warn(missing_docs)]
//! Configuration utilities shared by the catalog cache crates.
//!
//! This is a deliberately small subset of a full node-configuration framework: it gives every
//! config struct in the workspace a uniform way to describe itself (`dumping`) and to be built
//! from a JSON file layered with environment-variable overrides (`loading`). There is no
//! command-line argument layer here — this crate is a library dependency, not a binary, and
//! argv parsing is out of scope for the catalog cache.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use catalog_config::dumping::{ser_param, SerializeConfig};
//! use catalog_config::{ParamPath, SerializedParam};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
//! struct ConfigExample {
//!     key: usize,
//! }
//!
//! impl SerializeConfig for ConfigExample {
//!     fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
//!         BTreeMap::from([ser_param("key", &self.key, "This is key description.")])
//!     }
//! }
//!
//! let dumped = ConfigExample { key: 42 }.dump();
//! assert_eq!(dumped["key"].value, serde_json::json!(42));
//! ```

pub mod dumping;
pub mod loading;
pub mod validators;


use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A nested path of a configuration parameter, e.g. `"reload.interval_secs"`.
pub type ParamPath = String;
/// A human-readable description of a configuration parameter.
pub type Description = String;

/// A description and serialized JSON value of a single configuration parameter.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SerializedParam {
    /// The description of the parameter.
    pub description: Description,
    /// The value of the parameter.
    pub value: Value,
}

/// Errors raised while dumping, loading, or validating a configuration object.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Validation(validators::ParsedValidationErrors),
    #[error("Environment variable {key} could not be parsed as the expected type: {source}")]
    EnvVar { key: String, source: serde_json::Error },
}
