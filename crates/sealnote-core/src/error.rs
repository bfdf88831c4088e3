//! Error types for SealNote core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages. No variant ever carries a password, key
//! material, or note plaintext.

use thiserror::Error;

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Master password did not reproduce the stored key verifier
    #[error("Incorrect master password")]
    WrongPassword,

    /// An operation that needs the session key ran while locked
    #[error("Vault is locked")]
    NotUnlocked,

    /// Note not found by name
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Note name already in use
    #[error("Note already exists: {0}")]
    AlreadyExists(String),

    /// Ciphertext failed authentication (tampering, corruption or key mismatch)
    #[error("Authentication failed: note data is corrupted or was tampered with")]
    AuthenticationFailure,

    /// No vault at the given location
    #[error("Vault not found")]
    VaultNotFound,

    /// A vault already exists at the given location
    #[error("Vault already exists")]
    VaultExists,

    /// Persisted data could not be parsed or is inconsistent
    #[error("Corrupt vault data: {0}")]
    Corrupt(String),

    /// Key derivation or cipher setup error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Corrupt(err.to_string())
    }
}
