//! Application context for the SealNote CLI.
//!
//! Bundles CLI arguments with the loaded configuration so handlers do not
//! thread several parameters around.

use std::path::{Path, PathBuf};

use sealnote_core::{DirectoryStore, NoteService};

use crate::cli::{Cli, Commands};
use crate::config::{load_config, SealnoteConfig};
use crate::errors::from_vault_error;
use crate::ui::UiContext;

use super::resolver::resolve_vault_path;
use super::unlock::{unlock_with_retry, TerminalPrompt};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: SealnoteConfig,
    ui: UiContext,
}

impl<'a> AppContext<'a> {
    /// Load the config file and detect terminal capabilities.
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        let explicit = cli.config.as_deref().map(Path::new);
        // `init` may name a config file it is about to create.
        let creating = matches!(cli.command, Some(Commands::Init(_)));
        let config = match explicit {
            Some(path) if creating && !path.exists() => SealnoteConfig::default(),
            _ => load_config(explicit)?,
        };
        Ok(Self {
            cli,
            config,
            ui: UiContext::from_env(cli.no_color),
        })
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config(&self) -> &SealnoteConfig {
        &self.config
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    pub fn max_unlock_attempts(&self) -> u32 {
        self.config.security.max_unlock_attempts.max(1)
    }

    pub fn vault_path(&self) -> anyhow::Result<PathBuf> {
        resolve_vault_path(self.cli, &self.config)
    }

    /// Vault location for messages; empty if it cannot be resolved.
    pub fn vault_path_display(&self) -> String {
        self.vault_path()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    }

    /// Open the vault in the `Locked` state.
    pub fn open_service(&self) -> anyhow::Result<NoteService<DirectoryStore>> {
        let path = self.vault_path()?;
        NoteService::open(DirectoryStore::new(&path))
            .map_err(|err| from_vault_error(err, &path.display().to_string()))
    }

    /// Open the vault and unlock it from the terminal or `SEALNOTE_PASSPHRASE`.
    pub fn open_unlocked(&self) -> anyhow::Result<NoteService<DirectoryStore>> {
        let mut service = self.open_service()?;
        let mut prompt = TerminalPrompt::new();
        unlock_with_retry(
            &mut service,
            &mut prompt,
            &self.ui,
            &mut std::io::stderr(),
            self.max_unlock_attempts(),
        )?;
        Ok(service)
    }
}
