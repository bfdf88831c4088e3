//! Note service: the session state machine over a vault store.
//!
//! A `NoteService` starts `Locked`. A successful `unlock` derives the vault
//! key, checks it against the stored verifier, and keeps it in a `Session`
//! until `lock` is called or the service is dropped. Every note operation
//! needs an unlocked session.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{
    check_verifier, derive_key, generate_salt, initialize_verifier, open, seal,
    validate_password, DerivedKey, KdfParams, VaultSalt,
};
use crate::error::{Result, VaultError};
use crate::storage::{NoteName, NoteRecord, VaultHeader, VaultStore};

/// Whether the service currently holds a vault key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

/// Key material for one unlocked period. Dropping it zeroizes the key.
struct Session {
    key: DerivedKey,
    unlocked_at: DateTime<Utc>,
}

/// A decrypted note.
pub struct Note {
    pub name: NoteName,
    pub body: Zeroizing<String>,
    pub last_modified: DateTime<Utc>,
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("name", &self.name)
            .field("body", &"[REDACTED]")
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

/// Name and modification time of a stored note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub name: NoteName,
    pub last_modified: DateTime<Utc>,
}

impl From<&NoteRecord> for NoteSummary {
    fn from(record: &NoteRecord) -> Self {
        Self {
            name: record.name.clone(),
            last_modified: record.last_modified,
        }
    }
}

/// Result of opening every note in the vault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<(NoteName, String)>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Create, view, edit and delete encrypted notes.
pub struct NoteService<S: VaultStore> {
    store: S,
    header: VaultHeader,
    session: Option<Session>,
    failed_attempts: u32,
}

fn session_key(session: &Option<Session>) -> Result<&DerivedKey> {
    session
        .as_ref()
        .map(|session| &session.key)
        .ok_or(VaultError::NotUnlocked)
}

impl<S: VaultStore> NoteService<S> {
    /// Create a new vault in `store` and return an unlocked service.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::VaultExists` if the store already holds a vault,
    /// or `VaultError::InvalidInput` if the password is too weak.
    pub fn initialize(mut store: S, password: &SecretString, params: KdfParams) -> Result<Self> {
        validate_password(password.expose_secret())?;

        match store.load() {
            Err(VaultError::VaultNotFound) => {}
            Ok(_) => return Err(VaultError::VaultExists),
            Err(err) => return Err(err),
        }

        let salt = generate_salt()?;
        let key = derive_key(password, &salt, &params)?;
        let header = VaultHeader::new(params, salt, initialize_verifier(&key));
        store.initialize(&header)?;
        info!(
            memory_kib = params.memory_kib,
            iterations = params.iterations,
            "vault initialized"
        );

        Ok(Self {
            store,
            header,
            session: Some(Session {
                key,
                unlocked_at: Utc::now(),
            }),
            failed_attempts: 0,
        })
    }

    /// Open an existing vault in the `Locked` state.
    pub fn open(store: S) -> Result<Self> {
        let header = store.load()?;
        Ok(Self {
            store,
            header,
            session: None,
            failed_attempts: 0,
        })
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    /// When the current session was unlocked.
    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(|session| session.unlocked_at)
    }

    /// Wrong passwords entered since the last successful unlock.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn header(&self) -> &VaultHeader {
        &self.header
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Salt and parameters needed to derive the key off this thread.
    pub fn kdf_inputs(&self) -> (VaultSalt, KdfParams) {
        (self.header.salt, self.header.kdf)
    }

    /// Derive the key from `password` and unlock the session.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::WrongPassword` if the derived key does not match
    /// the stored verifier; the service is then `Locked`.
    pub fn unlock(&mut self, password: &SecretString) -> Result<()> {
        let derived = derive_key(password, &self.header.salt, &self.header.kdf);
        self.unlock_with_derived(derived)
    }

    /// Finish an unlock from the outcome of a derivation run elsewhere.
    ///
    /// A password the KDF refuses (such as an empty one) counts as a wrong
    /// password. Other derivation errors are returned unchanged.
    pub fn unlock_with_derived(&mut self, derived: Result<DerivedKey>) -> Result<()> {
        match derived {
            Ok(key) => self.unlock_with_key(key),
            Err(VaultError::InvalidInput(_)) => Err(self.reject_unlock()),
            Err(err) => Err(err),
        }
    }

    /// Unlock with a key derived elsewhere (e.g. on a worker thread).
    pub fn unlock_with_key(&mut self, key: DerivedKey) -> Result<()> {
        if !check_verifier(&key, &self.header.verifier) {
            return Err(self.reject_unlock());
        }

        self.session = Some(Session {
            key,
            unlocked_at: Utc::now(),
        });
        self.failed_attempts = 0;
        debug!("session unlocked");
        Ok(())
    }

    fn reject_unlock(&mut self) -> VaultError {
        self.session = None;
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        warn!(attempts = self.failed_attempts, "unlock rejected");
        VaultError::WrongPassword
    }

    /// Drop the session key.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            debug!("session locked");
        }
    }

    /// Encrypt and store a new note.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::AlreadyExists` if the name is taken.
    pub fn create(&mut self, name: &str, body: &str) -> Result<NoteSummary> {
        let key = session_key(&self.session)?;
        let name = NoteName::new(name)?;
        if self.store.contains(&name)? {
            return Err(VaultError::AlreadyExists(name.to_string()));
        }

        let sealed = seal(key, name.as_str().as_bytes(), body.as_bytes())?;
        let record = NoteRecord::from_sealed(name, sealed, Utc::now());
        self.store.put(&record)?;
        debug!(note = %record.name, "note created");
        Ok(NoteSummary::from(&record))
    }

    /// Decrypt a note.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if absent, or
    /// `VaultError::AuthenticationFailure` if the stored data does not
    /// authenticate under the session key.
    pub fn view(&self, name: &str) -> Result<Note> {
        let key = session_key(&self.session)?;
        let name = NoteName::new(name)?;
        let record = self.store.get(&name)?;
        let body = self.open_record(key, &record)?;
        Ok(Note {
            name: record.name,
            body,
            last_modified: record.last_modified,
        })
    }

    /// Replace the contents of an existing note under a fresh nonce.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if absent; the store is not touched.
    pub fn edit(&mut self, name: &str, body: &str) -> Result<NoteSummary> {
        let key = session_key(&self.session)?;
        let name = NoteName::new(name)?;
        if !self.store.contains(&name)? {
            return Err(VaultError::NotFound(name.to_string()));
        }

        let sealed = seal(key, name.as_str().as_bytes(), body.as_bytes())?;
        let record = NoteRecord::from_sealed(name, sealed, Utc::now());
        self.store.put(&record)?;
        debug!(note = %record.name, "note edited");
        Ok(NoteSummary::from(&record))
    }

    /// Permanently remove a note.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        session_key(&self.session)?;
        let name = NoteName::new(name)?;
        self.store.delete(&name)?;
        debug!(note = %name, "note deleted");
        Ok(())
    }

    /// Names and modification times of all notes, sorted by name.
    pub fn list(&self) -> Result<Vec<NoteSummary>> {
        session_key(&self.session)?;
        self.store
            .list()?
            .iter()
            .map(|name| self.store.get(name).map(|record| NoteSummary::from(&record)))
            .collect()
    }

    /// Open every note and report the ones that fail authentication or
    /// cannot be parsed.
    pub fn check(&self) -> Result<CheckReport> {
        let key = session_key(&self.session)?;
        let mut report = CheckReport::default();
        for name in self.store.list()? {
            report.checked += 1;
            let outcome = self
                .store
                .get(&name)
                .and_then(|record| self.open_record(key, &record).map(|_| ()));
            match outcome {
                Ok(()) => {}
                Err(err @ (VaultError::AuthenticationFailure | VaultError::Corrupt(_))) => {
                    report.failures.push((name, err.to_string()));
                }
                Err(err) => return Err(err),
            }
        }
        debug!(
            checked = report.checked,
            failures = report.failures.len(),
            "integrity check finished"
        );
        Ok(report)
    }

    fn open_record(&self, key: &DerivedKey, record: &NoteRecord) -> Result<Zeroizing<String>> {
        let plaintext = open(
            key,
            record.name.as_str().as_bytes(),
            &record.nonce,
            &record.ciphertext,
            &record.tag,
        )
        .inspect_err(|_| warn!(note = %record.name, "note failed authentication"))?;

        let body = std::str::from_utf8(&plaintext).map_err(|_| {
            VaultError::Corrupt(format!("Note \"{}\" is not valid UTF-8", record.name))
        })?;
        Ok(Zeroizing::new(body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::storage::{DirectoryStore, MAX_NAME_BYTES};

    const PASSWORD: &str = "correct horse battery";

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn fast_params() -> KdfParams {
        KdfParams::new(1024, 1, 1).unwrap()
    }

    fn new_service() -> (TempDir, NoteService<DirectoryStore>) {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("vault"));
        let service = NoteService::initialize(store, &secret(PASSWORD), fast_params()).unwrap();
        (dir, service)
    }

    fn reopen(dir: &TempDir) -> NoteService<DirectoryStore> {
        NoteService::open(DirectoryStore::new(dir.path().join("vault"))).unwrap()
    }

    #[test]
    fn test_initialize_starts_unlocked() {
        let (_dir, service) = new_service();
        assert_eq!(service.state(), SessionState::Unlocked);
        assert!(service.unlocked_at().is_some());
    }

    #[test]
    fn test_initialize_rejects_weak_password() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("vault"));
        let result = NoteService::initialize(store, &secret("short"), fast_params());
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_initialize_twice_fails() {
        let (dir, _service) = new_service();
        let store = DirectoryStore::new(dir.path().join("vault"));
        let result = NoteService::initialize(store, &secret(PASSWORD), fast_params());
        assert!(matches!(result, Err(VaultError::VaultExists)));
    }

    #[test]
    fn test_open_starts_locked() {
        let (dir, _service) = new_service();
        let service = reopen(&dir);
        assert_eq!(service.state(), SessionState::Locked);
    }

    #[test]
    fn test_create_then_view() {
        let (_dir, mut service) = new_service();
        service.create("a", "hello").unwrap();
        let note = service.view("a").unwrap();
        assert_eq!(note.body.as_str(), "hello");
        assert_eq!(note.name.as_str(), "a");
    }

    #[test]
    fn test_create_duplicate_fails() {
        let (_dir, mut service) = new_service();
        service.create("a", "hello").unwrap();
        let result = service.create("a", "again");
        assert!(matches!(result, Err(VaultError::AlreadyExists(ref n)) if n == "a"));
        assert_eq!(service.view("a").unwrap().body.as_str(), "hello");
    }

    #[test]
    fn test_delete_then_view_not_found() {
        let (_dir, mut service) = new_service();
        service.create("a", "hello").unwrap();
        service.delete("a").unwrap();
        assert!(matches!(service.view("a"), Err(VaultError::NotFound(_))));
        assert!(matches!(service.delete("a"), Err(VaultError::NotFound(_))));
    }

    #[test]
    fn test_edit_missing_does_not_mutate() {
        let (dir, mut service) = new_service();
        service.create("kept", "body").unwrap();
        let notes_dir = dir.path().join("vault").join("notes");
        let listing = || {
            let mut paths: Vec<_> = fs::read_dir(&notes_dir)
                .unwrap()
                .map(|e| e.unwrap().path())
                .collect();
            paths.sort();
            paths
        };
        let before = listing();

        let result = service.edit("missing", "x");

        assert!(matches!(result, Err(VaultError::NotFound(ref n)) if n == "missing"));
        assert_eq!(before, listing());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_reseals_with_fresh_nonce() {
        let (_dir, mut service) = new_service();
        service.create("a", "v1").unwrap();
        let name = NoteName::new("a").unwrap();
        let before = service.store().get(&name).unwrap();

        service.edit("a", "v2").unwrap();

        let after = service.store().get(&name).unwrap();
        assert_ne!(before.nonce, after.nonce);
        assert!(after.last_modified >= before.last_modified);
        assert_eq!(service.view("a").unwrap().body.as_str(), "v2");
    }

    #[test]
    fn test_wrong_password_stays_locked() {
        let (dir, mut service) = new_service();
        service.create("a", "hello").unwrap();
        drop(service);

        let mut service = reopen(&dir);
        let result = service.unlock(&secret("not the password"));

        assert!(matches!(result, Err(VaultError::WrongPassword)));
        assert_eq!(service.state(), SessionState::Locked);
        assert_eq!(service.failed_attempts(), 1);
        assert!(matches!(service.view("a"), Err(VaultError::NotUnlocked)));
        assert!(matches!(service.create("b", "x"), Err(VaultError::NotUnlocked)));
        assert!(matches!(service.edit("a", "x"), Err(VaultError::NotUnlocked)));
        assert!(matches!(service.delete("a"), Err(VaultError::NotUnlocked)));
        assert!(matches!(service.list(), Err(VaultError::NotUnlocked)));
        assert!(matches!(service.check(), Err(VaultError::NotUnlocked)));
    }

    #[test]
    fn test_empty_password_drops_session() {
        let (_dir, mut service) = new_service();
        assert!(service.is_unlocked());

        let result = service.unlock(&secret(""));

        assert!(matches!(result, Err(VaultError::WrongPassword)));
        assert_eq!(service.state(), SessionState::Locked);
        assert_eq!(service.failed_attempts(), 1);
    }

    #[test]
    fn test_wrong_password_while_unlocked_drops_session() {
        let (_dir, mut service) = new_service();

        let result = service.unlock(&secret("not the password"));

        assert!(matches!(result, Err(VaultError::WrongPassword)));
        assert!(matches!(service.list(), Err(VaultError::NotUnlocked)));
    }

    #[test]
    fn test_name_at_length_limit_round_trips() {
        let (dir, mut service) = new_service();
        let longest = "n".repeat(MAX_NAME_BYTES);

        service.create(&longest, "hello").unwrap();
        service.edit(&longest, "hello again").unwrap();
        assert_eq!(service.view(&longest).unwrap().body.as_str(), "hello again");

        let mut reopened = reopen(&dir);
        reopened.unlock(&secret(PASSWORD)).unwrap();
        let names: Vec<_> = reopened
            .list()
            .unwrap()
            .into_iter()
            .map(|note| note.name.to_string())
            .collect();
        assert_eq!(names, vec![longest.clone()]);
        assert!(matches!(
            service.create(&"n".repeat(MAX_NAME_BYTES + 1), "x"),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unlock_after_failure_resets_attempts() {
        let (dir, _service) = new_service();
        let mut service = reopen(&dir);
        let _ = service.unlock(&secret("wrong password 1"));
        let _ = service.unlock(&secret("wrong password 2"));
        assert_eq!(service.failed_attempts(), 2);

        service.unlock(&secret(PASSWORD)).unwrap();
        assert_eq!(service.failed_attempts(), 0);
        assert!(service.is_unlocked());
    }

    #[test]
    fn test_unlock_with_key_derived_elsewhere() {
        let (dir, _service) = new_service();
        let mut service = reopen(&dir);
        let (salt, params) = service.kdf_inputs();

        let key = std::thread::spawn(move || derive_key(&secret(PASSWORD), &salt, &params))
            .join()
            .unwrap()
            .unwrap();

        service.unlock_with_key(key).unwrap();
        assert!(service.is_unlocked());
    }

    #[test]
    fn test_lock_blocks_operations() {
        let (_dir, mut service) = new_service();
        service.create("a", "hello").unwrap();
        service.lock();
        assert_eq!(service.state(), SessionState::Locked);
        assert!(matches!(service.view("a"), Err(VaultError::NotUnlocked)));

        service.unlock(&secret(PASSWORD)).unwrap();
        assert_eq!(service.view("a").unwrap().body.as_str(), "hello");
    }

    #[test]
    fn test_invalid_name_rejected() {
        let (dir, mut service) = new_service();
        let result = service.create("../escape", "x");
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
        assert!(!dir.path().join("escape").exists());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_tampered_note_reports_authentication_failure() {
        let (_dir, mut service) = new_service();
        service.create("a", "hello").unwrap();
        let name = NoteName::new("a").unwrap();
        let mut record = service.store().get(&name).unwrap();
        record.ciphertext[0] ^= 0x80;
        service.store.put(&record).unwrap();

        assert!(matches!(
            service.view("a"),
            Err(VaultError::AuthenticationFailure)
        ));

        let report = service.check().unwrap();
        assert_eq!(report.checked, 1);
        assert!(!report.is_ok());
        assert_eq!(report.failures[0].0, name);
    }

    #[test]
    fn test_list_and_check_clean_vault() {
        let (_dir, mut service) = new_service();
        service.create("b", "2").unwrap();
        service.create("a", "1").unwrap();

        let names: Vec<String> = service
            .list()
            .unwrap()
            .into_iter()
            .map(|summary| summary.name.to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let report = service.check().unwrap();
        assert_eq!(report.checked, 2);
        assert!(report.is_ok());
    }

    #[test]
    fn test_note_debug_redacts_body() {
        let (_dir, mut service) = new_service();
        service.create("a", "super secret body").unwrap();
        let note = service.view("a").unwrap();
        let debug = format!("{:?}", note);
        assert!(!debug.contains("super secret body"));
        assert!(debug.contains("REDACTED"));
    }
}
