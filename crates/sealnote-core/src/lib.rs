//! # SealNote Core
//!
//! Core library for SealNote - a password-protected, encrypted note vault.
//!
//! This crate provides key derivation, note encryption, vault storage and the
//! session state machine, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation, password verifier, XChaCha20-Poly1305
//! - **storage**: `VaultStore` trait and the directory-backed implementation
//! - **service**: `NoteService`, the Locked/Unlocked session over a store
//! - **fs**: atomic write helpers

pub mod crypto;
pub mod error;
pub mod fs;
pub mod service;
pub mod storage;

pub use error::{Result, VaultError};
pub use service::{CheckReport, Note, NoteService, NoteSummary, SessionState};
pub use storage::{DirectoryStore, NoteName, VaultStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
