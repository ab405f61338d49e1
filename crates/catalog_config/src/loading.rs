//! Loads a configuration object from a default JSON file, with environment-variable overrides.
//!
//! Priority order, highest first:
//! * Environment variables, named explicitly per call site.
//! * The JSON file.
//!
//! There is deliberately no command-line argument layer here: the catalog cache is a library
//! dependency, not a binary, so there is no argv to merge in.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::ConfigError;

/// Loads `T` from a JSON file at `path`, applying environment-variable overrides named in
/// `env_overrides` (a list of `(dotted_param_path, env_var_name)` pairs).
pub fn load_with_env_overrides<T: for<'a> Deserialize<'a>>(
    path: &Path,
    env_overrides: &[(&str, &str)],
) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let mut value: Value = serde_json::from_reader(file)?;
    for (param_path, env_var) in env_overrides {
        let Ok(raw) = std::env::var(env_var) else { continue };
        let new_value = parse_env_value(&raw, env_var)?;
        set_by_path(&mut value, param_path, new_value);
    }
    Ok(serde_json::from_value(value)?)
}

fn parse_env_value(raw: &str, env_var: &str) -> Result<Value, ConfigError> {
    // Accept a JSON-encoded scalar so bools/numbers round-trip; fall back to a bare string.
    serde_json::from_str(raw)
        .or_else(|_| serde_json::to_value(raw))
        .map_err(|source| ConfigError::EnvVar { key: env_var.to_owned(), source })
}

fn set_by_path(root: &mut Value, dotted_path: &str, new_value: Value) {
    let segments: Vec<&str> = dotted_path.split('.').collect();
    let mut cursor = root;
    for segment in &segments[..segments.len().saturating_sub(1)] {
        cursor = cursor
            .as_object_mut()
            .expect("config documents are JSON objects at every nesting level")
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
    if let Some(last) = segments.last() {
        if let Some(obj) = cursor.as_object_mut() {
            obj.insert((*last).to_string(), new_value);
        }
    }
}
