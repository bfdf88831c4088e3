//! On-disk JSON representations of the header and note records.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{KdfParams, KeyVerifier, VaultSalt};
use crate::error::{Result, VaultError};
use crate::storage::types::{CipherAlgorithm, NoteName, NoteRecord, VaultHeader, FORMAT_VERSION};

/// Raw `vault.json` contents, byte fields base64 encoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct HeaderFile {
    pub format_version: u32,
    pub cipher: CipherAlgorithm,
    pub kdf: KdfParams,
    pub salt: String,
    pub verifier: String,
    pub created_at: DateTime<Utc>,
}

/// Raw note file contents, byte fields base64 encoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct NoteFile {
    pub name: String,
    pub nonce: String,
    pub ciphertext: String,
    pub tag: String,
    pub last_modified: DateTime<Utc>,
}

fn decode_array<const N: usize>(field: &str, value: &str) -> Result<[u8; N]> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| VaultError::Corrupt(format!("Invalid base64 in {}: {}", field, e)))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        VaultError::Corrupt(format!(
            "Invalid {} length: expected {} bytes, got {}",
            field,
            N,
            bytes.len()
        ))
    })
}

impl From<&VaultHeader> for HeaderFile {
    fn from(header: &VaultHeader) -> Self {
        Self {
            format_version: header.format_version,
            cipher: header.cipher,
            kdf: header.kdf,
            salt: STANDARD.encode(header.salt.as_bytes()),
            verifier: STANDARD.encode(header.verifier.as_bytes()),
            created_at: header.created_at,
        }
    }
}

impl TryFrom<HeaderFile> for VaultHeader {
    type Error = VaultError;

    fn try_from(file: HeaderFile) -> Result<Self> {
        if file.format_version != FORMAT_VERSION {
            return Err(VaultError::Corrupt(format!(
                "Unsupported vault format version {}",
                file.format_version
            )));
        }
        let kdf = KdfParams::new(
            file.kdf.memory_kib,
            file.kdf.iterations,
            file.kdf.parallelism,
        )
        .map_err(|e| VaultError::Corrupt(format!("Invalid KDF parameters: {}", e)))?;

        Ok(VaultHeader {
            format_version: file.format_version,
            cipher: file.cipher,
            kdf,
            salt: VaultSalt::from_bytes(decode_array("salt", &file.salt)?),
            verifier: KeyVerifier::from_bytes(decode_array("verifier", &file.verifier)?),
            created_at: file.created_at,
        })
    }
}

impl From<&NoteRecord> for NoteFile {
    fn from(record: &NoteRecord) -> Self {
        Self {
            name: record.name.to_string(),
            nonce: STANDARD.encode(record.nonce),
            ciphertext: STANDARD.encode(&record.ciphertext),
            tag: STANDARD.encode(record.tag),
            last_modified: record.last_modified,
        }
    }
}

impl TryFrom<NoteFile> for NoteRecord {
    type Error = VaultError;

    fn try_from(file: NoteFile) -> Result<Self> {
        let name = NoteName::new(file.name)
            .map_err(|e| VaultError::Corrupt(format!("Invalid stored note name: {}", e)))?;
        let ciphertext = STANDARD
            .decode(&file.ciphertext)
            .map_err(|e| VaultError::Corrupt(format!("Invalid base64 in ciphertext: {}", e)))?;

        Ok(NoteRecord {
            name,
            nonce: decode_array("nonce", &file.nonce)?,
            ciphertext,
            tag: decode_array("tag", &file.tag)?,
            last_modified: file.last_modified,
        })
    }
}
