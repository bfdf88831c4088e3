//! Directory-backed vault store.
//!
//! Layout:
//!
//! ```text
//! <vault>/
//!   vault.json               header (salt, verifier, KDF parameters)
//!   notes/<hex(name)>.note   one JSON record per note
//! ```
//!
//! Filenames are the lowercase hex encoding of the note name, which keeps
//! them unique on case-insensitive filesystems and free of separators.
//! Each write goes through a synced temp file that is renamed into place.

mod record;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, VaultError};
use crate::fs::{remove_temp_files, write_atomic};
use crate::storage::traits::VaultStore;
use crate::storage::types::{NoteName, NoteRecord, VaultHeader};

use record::{HeaderFile, NoteFile};

/// Header filename inside the vault directory.
pub const HEADER_FILE: &str = "vault.json";

/// Directory holding one file per note.
pub const NOTES_DIR: &str = "notes";

/// Extension of note record files.
pub const NOTE_EXTENSION: &str = "note";

/// Vault stored as a directory of JSON files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the vault.
    pub fn path(&self) -> &Path {
        &self.root
    }

    fn header_path(&self) -> PathBuf {
        self.root.join(HEADER_FILE)
    }

    fn notes_dir(&self) -> PathBuf {
        self.root.join(NOTES_DIR)
    }

    /// Path of the record file for `name`.
    pub fn note_path(&self, name: &NoteName) -> PathBuf {
        self.notes_dir().join(format!(
            "{}.{}",
            hex::encode(name.as_str()),
            NOTE_EXTENSION
        ))
    }

    fn name_from_path(path: &Path) -> Option<Result<NoteName>> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(NOTE_EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        Some(
            hex::decode(stem)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .ok_or_else(|| VaultError::Corrupt(format!("Unexpected note file: {}", stem)))
                .and_then(|name| NoteName::new(name)),
        )
    }

    fn ensure_dir(path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| {
            VaultError::Storage(format!(
                "Failed to create vault directory {}: {}",
                path.display(),
                e
            ))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
        }
        Ok(())
    }
}

impl VaultStore for DirectoryStore {
    fn load(&self) -> Result<VaultHeader> {
        let contents = match fs::read(self.header_path()) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(VaultError::VaultNotFound)
            }
            Err(err) => {
                return Err(VaultError::Storage(format!(
                    "Failed to read vault header {}: {}",
                    self.header_path().display(),
                    err
                )))
            }
        };
        let file: HeaderFile = serde_json::from_slice(&contents)?;
        let header = VaultHeader::try_from(file)?;

        let stale = remove_temp_files(&self.root)? + remove_temp_files(&self.notes_dir())?;
        if stale > 0 {
            warn!(count = stale, "removed interrupted writes from vault");
        }

        Ok(header)
    }

    fn initialize(&mut self, header: &VaultHeader) -> Result<()> {
        if self.header_path().exists() {
            return Err(VaultError::VaultExists);
        }
        Self::ensure_dir(&self.root)?;
        Self::ensure_dir(&self.notes_dir())?;

        let contents = serde_json::to_vec_pretty(&HeaderFile::from(header))?;
        write_atomic(&self.header_path(), &contents)
            .map_err(|e| VaultError::Storage(format!("Failed to write vault header: {}", e)))?;
        debug!(path = %self.root.display(), "vault header written");
        Ok(())
    }

    fn get(&self, name: &NoteName) -> Result<NoteRecord> {
        let contents = match fs::read(self.note_path(name)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(VaultError::NotFound(name.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        let file: NoteFile = serde_json::from_slice(&contents)?;
        let record = NoteRecord::try_from(file)?;
        if &record.name != name {
            return Err(VaultError::Corrupt(format!(
                "Note file for \"{}\" holds \"{}\"",
                name, record.name
            )));
        }
        Ok(record)
    }

    fn put(&mut self, record: &NoteRecord) -> Result<()> {
        let notes_dir = self.notes_dir();
        if !notes_dir.exists() {
            Self::ensure_dir(&notes_dir)?;
        }
        let contents = serde_json::to_vec_pretty(&NoteFile::from(record))?;
        write_atomic(&self.note_path(&record.name), &contents)
            .map_err(|e| VaultError::Storage(format!("Failed to write note: {}", e)))?;
        debug!(note = %record.name, bytes = contents.len(), "note record written");
        Ok(())
    }

    fn delete(&mut self, name: &NoteName) -> Result<()> {
        match fs::remove_file(self.note_path(name)) {
            Ok(()) => {
                debug!(note = %name, "note record removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(VaultError::NotFound(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self) -> Result<Vec<NoteName>> {
        let entries = match fs::read_dir(self.notes_dir()) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(name) = Self::name_from_path(&path) {
                names.push(name?);
            }
        }
        names.sort();
        Ok(names)
    }

    fn contains(&self, name: &NoteName) -> Result<bool> {
        Ok(self.note_path(name).exists())
    }
}
