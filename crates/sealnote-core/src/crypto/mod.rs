//! Cryptographic operations for SealNote.
//!
//! - **Argon2id**: memory-hard derivation of the vault key
//! - **BLAKE3**: keyed-hash verifier for the master password
//! - **XChaCha20-Poly1305**: authenticated encryption of note bodies
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the vault directory
//! - Offline brute-force attacks on the master password
//! - Tampering with or swapping note files
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / process memory

pub mod cipher;
pub mod key;
pub mod passphrase;
pub mod verifier;

pub use cipher::{open, seal, SealedNote, NONCE_LENGTH, TAG_LENGTH};
pub use key::{derive_key, generate_salt, DerivedKey, KdfParams, VaultSalt, KEY_LENGTH};
pub use passphrase::validate_password;
pub use verifier::{check_verifier, initialize_verifier, KeyVerifier};
