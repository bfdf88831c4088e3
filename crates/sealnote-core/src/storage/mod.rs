//! Storage abstraction for SealNote.
//!
//! This module defines the `VaultStore` trait and the types persisted by
//! every backend.
//!
//! ## Architecture
//!
//! - `DirectoryStore`: one JSON file per note under a vault directory
//!
//! ## Security
//!
//! Stores never see plaintext or key material. They are responsible for:
//! - Atomic writes (temp file + rename) so a crash cannot corrupt a note
//! - Keeping the vault salt stable once written

pub mod directory;
pub mod traits;
pub mod types;

pub use directory::DirectoryStore;
pub use traits::VaultStore;
pub use types::{
    CipherAlgorithm, NoteName, NoteRecord, VaultHeader, FORMAT_VERSION, MAX_NAME_BYTES,
};
