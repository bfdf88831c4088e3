//! Master password verification.
//!
//! The verifier is a BLAKE3 keyed hash of a fixed label under the derived
//! key. Recomputing it tells a wrong password apart from corrupted notes
//! without attempting to decrypt anything.

use super::key::DerivedKey;

/// Label hashed under the derived key to produce the verifier.
const VERIFIER_LABEL: &[u8] = b"sealnote key verifier v1";

/// Length of a key verifier in bytes.
pub const VERIFIER_LENGTH: usize = 32;

/// Persisted check value for the master password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyVerifier([u8; VERIFIER_LENGTH]);

impl KeyVerifier {
    pub fn from_bytes(bytes: [u8; VERIFIER_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; VERIFIER_LENGTH] {
        &self.0
    }
}

/// Compute the verifier for a freshly derived key.
pub fn initialize_verifier(key: &DerivedKey) -> KeyVerifier {
    let hash = blake3::keyed_hash(key.as_bytes(), VERIFIER_LABEL);
    KeyVerifier(*hash.as_bytes())
}

/// Check a candidate key against the stored verifier in constant time.
pub fn check_verifier(key: &DerivedKey, verifier: &KeyVerifier) -> bool {
    let expected = blake3::Hash::from(verifier.0);
    blake3::keyed_hash(key.as_bytes(), VERIFIER_LABEL) == expected
}
