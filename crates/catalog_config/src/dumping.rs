//! Utilities for serializing config objects into a flattened, self-describing map.
//!
//! The elements structure is:
//!
//! ```ignore
//! "conf1.conf2.param_name": {
//!     "description": "Param description.",
//!     "value": json_value
//! }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::{ParamPath, SerializedParam};

/// Gives a config struct a uniform way to describe its fields for presentation/debugging.
pub trait SerializeConfig {
    /// Flattens the configuration into a map of dotted parameter paths to descriptions and
    /// values.
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam>;
}

/// Prefixes every key of `sub_config_dump` with `sub_config_name.`, for nesting a sub-config's
/// dump under its owning struct's field name.
pub fn append_sub_config_name(
    sub_config_dump: BTreeMap<ParamPath, SerializedParam>,
    sub_config_name: &str,
) -> BTreeMap<ParamPath, SerializedParam> {
    BTreeMap::from_iter(
        sub_config_dump
            .into_iter()
            .map(|(field_name, val)| (format!("{sub_config_name}.{field_name}"), val)),
    )
}

/// Serializes a single config parameter into a `(name, SerializedParam)` pair suitable for
/// inserting into a dump map.
pub fn ser_param<T: Serialize>(
    name: &str,
    value: &T,
    description: &str,
) -> (String, SerializedParam) {
    (name.to_owned(), SerializedParam { description: description.to_owned(), value: json!(value) })
}
