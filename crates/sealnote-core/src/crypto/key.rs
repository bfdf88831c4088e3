//! Key derivation using Argon2id.
//!
//! This module derives the vault key from the master password using the
//! Argon2id algorithm, which is memory-hard and resistant to GPU-based attacks.
//! Work parameters are stored in the vault header so that a vault keeps
//! deriving the same key even if the defaults change later.

use argon2::Argon2;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, VaultError};

/// Default Argon2id parameters.
///
/// These values balance security and usability:
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1 (single lane)
const ARGON2_MEMORY_KIB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (32 bytes = 256 bits).
pub const KEY_LENGTH: usize = 32;

/// Length of the vault salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Argon2id work parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

impl KdfParams {
    /// Create custom parameters, rejecting values Argon2 would refuse.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        params.to_argon2()?;
        Ok(params)
    }

    fn to_argon2(self) -> Result<argon2::Params> {
        argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| VaultError::InvalidInput(format!("Invalid Argon2 parameters: {}", e)))
    }
}

/// Random salt generated once per vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultSalt([u8; SALT_LENGTH]);

impl VaultSalt {
    /// Wrap salt bytes read back from storage.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

/// Generate a fresh vault salt from the OS random source.
pub fn generate_salt() -> Result<VaultSalt> {
    let mut bytes = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| VaultError::Crypto(format!("Failed to generate salt: {}", e)))?;
    Ok(VaultSalt(bytes))
}

/// A cryptographic key derived from the master password.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped, reducing the window of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a new DerivedKey from raw bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the vault key from the master password using Argon2id.
///
/// # Security
///
/// - Same password + salt + params always produces the same key
/// - Different salt produces a different key (salt is stored with the vault)
/// - Memory-hard: the default parameters need ~64MB RAM per attempt
///
/// # Examples
///
/// ```
/// use sealnote_core::crypto::{derive_key, generate_salt, KdfParams};
/// use secrecy::SecretString;
///
/// let salt = generate_salt().unwrap();
/// let params = KdfParams::new(1024, 1, 1).unwrap();
/// let password = SecretString::from("my-passphrase".to_string());
/// let key = derive_key(&password, &salt, &params).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(
    password: &SecretString,
    salt: &VaultSalt,
    params: &KdfParams,
) -> Result<DerivedKey> {
    let password = password.expose_secret();
    if password.is_empty() {
        return Err(VaultError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params.to_argon2()?,
    );

    let mut key_bytes = Zeroizing::new([0u8; KEY_LENGTH]);
    argon2
        .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut key_bytes[..])
        .map_err(|e| VaultError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(*key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KdfParams {
        KdfParams::new(1024, 1, 1).unwrap()
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = VaultSalt::from_bytes(*b"unique-salt-1234");

        let key1 = derive_key(&secret("test-passphrase"), &salt, &fast_params()).unwrap();
        let key2 = derive_key(&secret("test-passphrase"), &salt, &fast_params()).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let salt1 = VaultSalt::from_bytes(*b"salt1-1234567890");
        let salt2 = VaultSalt::from_bytes(*b"salt2-1234567890");

        let key1 = derive_key(&secret("test-passphrase"), &salt1, &fast_params()).unwrap();
        let key2 = derive_key(&secret("test-passphrase"), &salt2, &fast_params()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = VaultSalt::from_bytes(*b"fixed-salt-12345");

        let key1 = derive_key(&secret("passphrase-one"), &salt, &fast_params()).unwrap();
        let key2 = derive_key(&secret("passphrase-two"), &salt, &fast_params()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_params_different_key() {
        let salt = VaultSalt::from_bytes(*b"fixed-salt-12345");
        let slower = KdfParams::new(2048, 2, 1).unwrap();

        let key1 = derive_key(&secret("test-passphrase"), &salt, &fast_params()).unwrap();
        let key2 = derive_key(&secret("test-passphrase"), &salt, &slower).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_rejected() {
        let salt = VaultSalt::from_bytes([7u8; SALT_LENGTH]);
        let result = derive_key(&secret(""), &salt, &fast_params());
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(KdfParams::new(1024, 0, 1).is_err());
        assert!(KdfParams::new(1, 1, 1).is_err());
    }

    #[test]
    fn test_default_params() {
        let params = KdfParams::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 1);
    }

    #[test]
    fn test_generated_salts_differ() {
        let salt1 = generate_salt().unwrap();
        let salt2 = generate_salt().unwrap();
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let salt = VaultSalt::from_bytes([3u8; SALT_LENGTH]);
        let key = derive_key(&secret("test-passphrase"), &salt, &fast_params()).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
