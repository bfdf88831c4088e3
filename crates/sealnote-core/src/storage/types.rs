//! Core data types for vault storage.
//!
//! These types are storage-format agnostic; backends translate them to and
//! from their own on-disk representation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{KdfParams, KeyVerifier, SealedNote, VaultSalt, NONCE_LENGTH, TAG_LENGTH};
use crate::error::{Result, VaultError};

/// Current vault format version.
pub const FORMAT_VERSION: u32 = 1;

/// Maximum note name length in bytes.
///
/// Names are hex-encoded into filenames, and the in-flight copy adds
/// `.note.<nanos>.tmp`; both must stay under the common 255-byte limit.
pub const MAX_NAME_BYTES: usize = 100;

/// Validated note identifier.
///
/// Names are printable, carry no path separators, have no surrounding
/// whitespace and are never `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteName(String);

impl NoteName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "Note name cannot be empty".to_string(),
            ));
        }
        if name.trim() != name {
            return Err(VaultError::InvalidInput(
                "Note name cannot start or end with whitespace".to_string(),
            ));
        }
        if name.len() > MAX_NAME_BYTES {
            return Err(VaultError::InvalidInput(format!(
                "Note name must be at most {} bytes",
                MAX_NAME_BYTES
            )));
        }
        if name.contains(['/', '\\']) {
            return Err(VaultError::InvalidInput(
                "Note name cannot contain path separators".to_string(),
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(VaultError::InvalidInput(
                "Note name cannot contain control characters".to_string(),
            ));
        }
        if name == "." || name == ".." {
            return Err(VaultError::InvalidInput(format!(
                "\"{}\" is not a valid note name",
                name
            )));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteName {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for NoteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A persisted, encrypted note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub name: NoteName,
    pub nonce: [u8; NONCE_LENGTH],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LENGTH],
    pub last_modified: DateTime<Utc>,
}

impl NoteRecord {
    /// Build a record from freshly sealed content.
    pub fn from_sealed(name: NoteName, sealed: SealedNote, last_modified: DateTime<Utc>) -> Self {
        Self {
            name,
            nonce: sealed.nonce,
            ciphertext: sealed.ciphertext,
            tag: sealed.tag,
            last_modified,
        }
    }
}

/// Authenticated cipher used for note bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherAlgorithm {
    #[serde(rename = "xchacha20poly1305")]
    XChaCha20Poly1305,
}

/// Vault-wide parameters needed to unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    pub format_version: u32,
    pub cipher: CipherAlgorithm,
    pub kdf: KdfParams,
    pub salt: VaultSalt,
    pub verifier: KeyVerifier,
    pub created_at: DateTime<Utc>,
}

impl VaultHeader {
    /// Header for a vault created now with the current format.
    pub fn new(kdf: KdfParams, salt: VaultSalt, verifier: KeyVerifier) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            cipher: CipherAlgorithm::XChaCha20Poly1305,
            kdf,
            salt,
            verifier,
            created_at: Utc::now(),
        }
    }
}
