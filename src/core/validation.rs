//! Structural invariants the schemas cannot express on their own.
//!
//! Validates application keys, variable names, and configuration uniqueness.

use std::collections::HashSet;

use crate::core::constants::KV_PREFIX;
use crate::core::domain::ConfigurationItem;
use crate::error::{Result, ValidationError};

/// Longest application key accepted.
pub const MAX_APP_KEY_LEN: usize = 40;

/// Validate an application key.
///
/// Keys end up in URLs, container names and directory names, so they must be:
/// - lowercase ASCII letters, digits and hyphens only
/// - not starting or ending with a hyphen
/// - between 1 and 40 characters
///
/// # Errors
///
/// Returns `ValidationError::InvalidKey` if the key is not a safe token.
pub fn validate_app_key(key: &str) -> Result<()> {
    let reject = |reason: String| -> crate::error::Error {
        ValidationError::InvalidKey {
            key: key.to_string(),
            reason,
        }
        .into()
    };

    if key.is_empty() {
        return Err(reject("cannot be empty".to_string()));
    }
    if key.len() > MAX_APP_KEY_LEN {
        return Err(reject(format!("longer than {} characters", MAX_APP_KEY_LEN)));
    }
    if key.starts_with('-') || key.ends_with('-') {
        return Err(reject("cannot start or end with '-'".to_string()));
    }

    for (i, ch) in key.chars().enumerate() {
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-') {
            return Err(reject(format!(
                "invalid character '{}' at position {}. Only a-z, 0-9, and '-' are allowed",
                ch,
                i + 1
            )));
        }
    }

    Ok(())
}

/// Validate an environment variable name.
///
/// - Only ASCII letters, digits and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError::InvalidKey` if the name is invalid.
pub fn validate_variable_name(name: &str) -> Result<()> {
    let reject = |reason: String| -> crate::error::Error {
        ValidationError::InvalidKey {
            key: name.to_string(),
            reason,
        }
        .into()
    };

    match name.chars().next() {
        None => return Err(reject("cannot be empty".to_string())),
        Some(first) if first.is_ascii_digit() => {
            return Err(reject("cannot start with a digit".to_string()))
        }
        _ => {}
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(reject(format!(
                "invalid character '{}' at position {}. Only A-Z, 0-9, and underscore are allowed",
                ch,
                i + 1
            )));
        }
    }

    Ok(())
}

/// Validate that configuration item names are valid and unique.
///
/// A `variable` item may not carry a `kv://` value: the env template could
/// not tell it apart from a key vault reference.
///
/// # Errors
///
/// Returns `ValidationError::InvalidKey` for a bad name,
/// `ValidationError::DuplicateItem` for the first repeated one, or
/// `ValidationError::ReservedValue` for a `kv://` literal.
pub fn validate_configuration(items: &[ConfigurationItem]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        validate_variable_name(&item.name)?;
        if !seen.insert(item.name.as_str()) {
            return Err(ValidationError::DuplicateItem(item.name.clone()).into());
        }
        if !item.is_keyvault() && item.value.starts_with(KV_PREFIX) {
            return Err(ValidationError::ReservedValue(item.name.clone()).into());
        }
    }
    Ok(())
}

/// Validate file permissions (Unix only).
///
/// # Errors
///
/// Returns `ValidationError::InvalidPermissions` if the mode differs.
#[cfg(unix)]
pub fn validate_file_permissions(path: &std::path::Path, expected_mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let actual_mode = metadata.permissions().mode() & 0o777;

    if actual_mode != expected_mode {
        return Err(ValidationError::InvalidPermissions {
            path: path.display().to_string(),
            expected: format!("{:o}", expected_mode),
            actual: format!("{:o}", actual_mode),
        }
        .into());
    }

    Ok(())
}
