//! Master password validation.
//!
//! Enforces minimum requirements when a vault is first created.

use crate::error::{Result, VaultError};

/// Minimum password length in characters.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a new master password.
///
/// # Requirements
///
/// - At least 8 characters long
/// - Not empty or only whitespace
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(VaultError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}
