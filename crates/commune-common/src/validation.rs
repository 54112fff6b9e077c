//! Input validation utilities.
//!
//! Centralized validation helpers used by the moderation layer.

use validator::Validate;

use crate::error::CommuneError;

/// Validate a request body, returning a CommuneError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), CommuneError> {
    body.validate().map_err(|e| CommuneError::Validation {
        message: format_validation_errors(e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Adapter for `#[validate(custom(...))]` on role name fields.
pub fn validate_role_name(name: &str) -> Result<(), validator::ValidationError> {
    validate_name(name).map_err(|e| {
        let message = match e {
            CommuneError::Validation { message } => message,
            other => other.to_string(),
        };
        validator::ValidationError::new("role_name").with_message(message.into())
    })
}

/// Validate that a string is a safe role name.
pub fn validate_name(name: &str) -> Result<(), CommuneError> {
    if name.trim().is_empty() {
        return Err(CommuneError::Validation {
            message: "Name cannot be empty or whitespace only".into(),
        });
    }

    let valid = name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' ');

    if !valid {
        return Err(CommuneError::Validation {
            message: "Name can only contain letters, numbers, hyphens, underscores, and spaces"
                .into(),
        });
    }

    Ok(())
}
