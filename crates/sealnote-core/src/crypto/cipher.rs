//! Authenticated note encryption using XChaCha20-Poly1305.
//!
//! Every call to [`seal`] draws a fresh 192-bit random nonce, so nonce reuse
//! under one key is not a practical concern and no counter state has to be
//! persisted. The note name is bound in as associated data.

use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{Key, Tag, XChaCha20Poly1305, XNonce};
use zeroize::Zeroizing;

use super::key::DerivedKey;
use crate::error::{Result, VaultError};

/// XChaCha20 nonce size (24 bytes).
pub const NONCE_LENGTH: usize = 24;

/// Poly1305 tag size (16 bytes).
pub const TAG_LENGTH: usize = 16;

/// Output of a seal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedNote {
    pub nonce: [u8; NONCE_LENGTH],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LENGTH],
}

fn cipher_for(key: &DerivedKey) -> XChaCha20Poly1305 {
    XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()))
}

fn fresh_nonce() -> Result<[u8; NONCE_LENGTH]> {
    let mut nonce = [0u8; NONCE_LENGTH];
    getrandom::getrandom(&mut nonce)
        .map_err(|e| VaultError::Crypto(format!("Failed to generate nonce: {}", e)))?;
    Ok(nonce)
}

/// Encrypt `plaintext` under `key`, authenticating `aad` alongside it.
pub fn seal(key: &DerivedKey, aad: &[u8], plaintext: &[u8]) -> Result<SealedNote> {
    let nonce = fresh_nonce()?;
    let mut buffer = plaintext.to_vec();
    let tag = cipher_for(key)
        .encrypt_in_place_detached(XNonce::from_slice(&nonce), aad, &mut buffer)
        .map_err(|_| VaultError::Crypto("Encryption failed".to_string()))?;

    let mut tag_bytes = [0u8; TAG_LENGTH];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(SealedNote {
        nonce,
        ciphertext: buffer,
        tag: tag_bytes,
    })
}

/// Decrypt and verify a sealed note.
///
/// # Errors
///
/// Returns `VaultError::AuthenticationFailure` on any tag mismatch: wrong
/// key, modified ciphertext, modified tag, or different associated data.
/// No plaintext is released in that case.
pub fn open(
    key: &DerivedKey,
    aad: &[u8],
    nonce: &[u8; NONCE_LENGTH],
    ciphertext: &[u8],
    tag: &[u8; TAG_LENGTH],
) -> Result<Zeroizing<Vec<u8>>> {
    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher_for(key)
        .decrypt_in_place_detached(
            XNonce::from_slice(nonce),
            aad,
            &mut buffer[..],
            Tag::from_slice(tag),
        )
        .map_err(|_| VaultError::AuthenticationFailure)?;
    Ok(buffer)
}
