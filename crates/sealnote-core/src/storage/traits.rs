//! Vault store trait definition.
//!
//! The `VaultStore` trait defines the interface that all storage backends
//! must implement. Stores only ever see ciphertext; sealing and opening
//! happen in the service layer.

use super::types::{NoteName, NoteRecord, VaultHeader};
use crate::error::{Result, VaultError};

/// Persistence interface for an encrypted vault.
///
/// All implementations must ensure:
/// - Every write is atomic: a crash leaves either the old or the new record
/// - Note names are unique
/// - Records are returned exactly as they were stored
pub trait VaultStore: Send + Sync {
    /// Read the vault header.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::VaultNotFound` if nothing was initialized at this
    /// location, or `VaultError::Corrupt` if the header cannot be parsed.
    fn load(&self) -> Result<VaultHeader>;

    /// Persist the header of a brand new vault.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::VaultExists` if a header is already present; the
    /// salt of an existing vault is never replaced.
    fn initialize(&mut self, header: &VaultHeader) -> Result<()>;

    /// Fetch a note record by name.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if no such note exists.
    fn get(&self, name: &NoteName) -> Result<NoteRecord>;

    /// Insert or overwrite a note record.
    fn put(&mut self, record: &NoteRecord) -> Result<()>;

    /// Remove a note record permanently.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if no such note exists.
    fn delete(&mut self, name: &NoteName) -> Result<()>;

    /// List all note names in ascending order.
    fn list(&self) -> Result<Vec<NoteName>>;

    /// Whether a note with this name exists.
    fn contains(&self, name: &NoteName) -> Result<bool> {
        match self.get(name) {
            Ok(_) => Ok(true),
            Err(VaultError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_boxed_store(_store: Box<dyn VaultStore>) {}
    }
}
