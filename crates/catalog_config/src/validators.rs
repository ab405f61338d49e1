//! Utilities for turning `validator` crate errors into readable messages.

use std::fmt::Display;
use std::path::Path;

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::ConfigError;

/// Custom validation for ASCII-only strings (e.g. server names used in error messages sent over
/// the wire).
pub fn validate_ascii(name: &impl ToString) -> Result<(), ValidationError> {
    if !name.to_string().is_ascii() {
        return Err(ValidationError::new("The value is not ASCII"));
    }
    Ok(())
}

/// Custom validation for file-or-directory path existence.
pub fn validate_path_exists(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        let mut error = ValidationError::new("file or directory not found");
        error.message =
            Some("Please create the file/directory or change the path in the configuration.".into());
        return Err(error);
    }
    Ok(())
}

/// A single flattened validation failure.
#[derive(Debug)]
pub struct ParsedValidationError {
    /// The dotted path of the field that failed validation.
    pub param_path: String,
    /// The error code.
    pub code: String,
    /// The error message, if any.
    pub message: Option<String>,
}

/// A flattened, human-readable collection of validation errors.
#[derive(thiserror::Error, Debug)]
pub struct ParsedValidationErrors(pub Vec<ParsedValidationError>);

impl From<ValidationErrors> for ParsedValidationErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut parsed = ParsedValidationErrors(vec![]);
        flatten(&errors, String::new(), &mut parsed);
        parsed
    }
}

impl Display for ParsedValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for error in &self.0 {
            writeln!(
                f,
                "Configuration error: field {} failed validation: {}{}",
                error.param_path,
                error.code,
                error.message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default(),
            )?;
        }
        Ok(())
    }
}

/// Validates `config`, converting `validator`'s nested error tree into a single [`ConfigError`].
pub fn config_validate<T: Validate>(config: &T) -> Result<(), ConfigError> {
    config
        .validate()
        .map_err(|errors| ConfigError::Validation(ParsedValidationErrors::from(errors)))
}

fn flatten(errors: &ValidationErrors, current_path: String, out: &mut ParsedValidationErrors) {
    for (field, error) in errors.errors().iter() {
        let path = if current_path.is_empty() {
            field.to_string()
        } else {
            format!("{current_path}.{field}")
        };
        match error {
            ValidationErrorsKind::Struct(inner) => flatten(inner, path, out),
            ValidationErrorsKind::List(list) => {
                for (index, inner) in list.iter() {
                    flatten(inner, format!("{path}[{index}]"), out);
                }
            }
            ValidationErrorsKind::Field(field_errors) => {
                for field_error in field_errors {
                    out.0.push(ParsedValidationError {
                        param_path: path.clone(),
                        code: field_error.code.to_string(),
                        message: field_error.message.as_ref().map(|m| m.to_string()),
                    });
                }
            }
        }
    }
}
