//! Path resolution for the vault directory.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{default_vault_path, SealnoteConfig};

/// Resolve the vault directory.
///
/// Order: `--vault` (or `SEALNOTE_VAULT`), then `[vault] path` from the
/// config file, then the XDG data directory.
pub fn resolve_vault_path(cli: &Cli, config: &SealnoteConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.vault.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.vault.path.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_vault_path()
}
