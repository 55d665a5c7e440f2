//! Validation helper functions for configuration types.

use std::path::{Component, Path};

use crate::core::errors::{Result, WalkError};

/// Validate that a u64 value is greater than zero.
pub fn validate_positive_u64(value: u64, field: &str) -> Result<()> {
    if value == 0 {
        return Err(WalkError::config_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a string value is not empty or whitespace.
pub fn validate_non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WalkError::config_field(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a repository-relative path cannot climb out of the workspace.
pub fn validate_contained_path(value: &str, field: &str) -> Result<()> {
    let escapes = Path::new(value)
        .components()
        .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        return Err(WalkError::config_field(
            format!("{} '{}' must not contain '..' components", field, value),
            field,
        ));
    }
    Ok(())
}

/// Validate that a reference name is fully qualified (`refs/...`).
pub fn validate_reference_name(value: &str, field: &str) -> Result<()> {
    let qualified = value
        .strip_prefix("refs/")
        .is_some_and(|rest| !rest.is_empty() && !rest.ends_with('/'));
    if !qualified || !git2::Reference::is_valid_name(value) {
        return Err(WalkError::config_field(
            format!(
                "{} '{}' must be a full reference name such as refs/heads/main or refs/tags/v1.0",
                field, value
            ),
            field,
        ));
    }
    Ok(())
}
