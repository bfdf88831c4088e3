use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use sealnote_core::{DirectoryStore, NoteService, VaultError};

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{default_config_path, write_config, SealnoteConfig};
use crate::errors::CliError;
use crate::helpers::prompt_init_passphrase;
use crate::ui::{hint, receipt, Spinner};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let target = match args.path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => ctx.vault_path()?,
    };
    let params = ctx.config().kdf.params()?;
    let password = prompt_init_passphrase(std::io::stdin().is_terminal())?;

    let spinner = Spinner::start(ctx.ui(), "Creating vault");
    let store = DirectoryStore::new(&target);
    let worker = std::thread::spawn(move || {
        NoteService::initialize(store, &password, params).map(|mut service| service.lock())
    });
    let joined = worker.join();
    spinner.finish();

    match joined {
        Ok(Ok(())) => {}
        Ok(Err(VaultError::VaultExists)) => {
            return Err(CliError::invalid_input(format!(
                "A vault already exists at {}",
                target.display()
            ))
            .into())
        }
        Ok(Err(VaultError::InvalidInput(message))) => {
            return Err(CliError::invalid_input(message).into())
        }
        Ok(Err(err)) => return Err(err.into()),
        Err(_) => return Err(anyhow::anyhow!("Vault creation worker panicked")),
    }

    let config_note = if args.no_config {
        None
    } else {
        remember_vault_path(ctx, &target)?
    };

    if !ctx.quiet() {
        let location = target.display().to_string();
        let kdf = format!(
            "argon2id, {} KiB, {} passes",
            params.memory_kib, params.iterations
        );
        let config_path = config_note.map(|path| path.display().to_string());
        let mut items = vec![("Vault", location.as_str()), ("KDF", kdf.as_str())];
        if let Some(path) = config_path.as_deref() {
            items.push(("Config", path));
        }
        println!("{}", receipt(ctx.ui(), "Vault created", &items));
        println!("{}", hint(ctx.ui(), "Run `sealnote` to start writing notes."));
    }
    Ok(())
}

/// Write a config pointing at `target` unless one already exists.
fn remember_vault_path(
    ctx: &AppContext,
    target: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    let config_path = match ctx.cli().config.as_deref() {
        Some(path) => PathBuf::from(path),
        None => default_config_path()?,
    };
    if config_path.exists() {
        return Ok(None);
    }

    let mut config = SealnoteConfig::with_vault_path(target);
    config.kdf = ctx.config().kdf.clone();
    write_config(&config_path, &config)?;
    Ok(Some(config_path))
}
