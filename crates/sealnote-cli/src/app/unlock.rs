//! Password prompting and session unlock with retry logic.

use std::io::{IsTerminal, Write};

use secrecy::SecretString;
use tracing::debug;

use sealnote_core::crypto::{derive_key, DerivedKey, KdfParams, VaultSalt};
use sealnote_core::{NoteService, VaultError, VaultStore};

use crate::constants::PASSPHRASE_ENV;
use crate::errors::CliError;
use crate::helpers::{env_passphrase, prompt_passphrase};
use crate::ui::{badge, Badge, Spinner, UiContext};

/// Source of master password candidates.
pub trait PassphrasePrompt {
    /// Password for the given 1-based attempt, or `None` when no more
    /// candidates can be obtained.
    fn next_passphrase(&mut self, attempt: u32) -> anyhow::Result<Option<SecretString>>;
}

/// Reads `SEALNOTE_PASSPHRASE` on the first attempt, then the terminal.
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl PassphrasePrompt for TerminalPrompt {
    fn next_passphrase(&mut self, attempt: u32) -> anyhow::Result<Option<SecretString>> {
        if attempt == 1 {
            if let Some(value) = env_passphrase() {
                return Ok(Some(value));
            }
        }
        if !self.interactive {
            return Ok(None);
        }
        prompt_passphrase().map(Some)
    }
}

/// Run Argon2 on a worker thread while a spinner animates.
pub fn derive_on_worker(
    ui: &UiContext,
    password: SecretString,
    salt: VaultSalt,
    params: KdfParams,
) -> sealnote_core::Result<DerivedKey> {
    let spinner = Spinner::start(ui, "Deriving key");
    let worker = std::thread::spawn(move || derive_key(&password, &salt, &params));
    let joined = worker.join();
    spinner.finish();
    joined.unwrap_or_else(|_| Err(VaultError::Crypto("key derivation worker panicked".into())))
}

/// Unlock `service`, re-prompting after wrong passwords.
///
/// Retry warnings go to `out`. Fails with an authentication error once `max_attempts` passwords were
/// rejected or the prompt runs out of candidates.
pub fn unlock_with_retry<S, P, W>(
    service: &mut NoteService<S>,
    prompt: &mut P,
    ui: &UiContext,
    out: &mut W,
    max_attempts: u32,
) -> anyhow::Result<()>
where
    S: VaultStore,
    P: PassphrasePrompt,
    W: Write,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let Some(password) = prompt.next_passphrase(attempt)? else {
            return Err(CliError::auth_failed_with_hint(
                "No master password provided.",
                format!("Hint: Run in a terminal or set {}.", PASSPHRASE_ENV),
            )
            .into());
        };

        let (salt, params) = service.kdf_inputs();
        let outcome = service.unlock_with_derived(derive_on_worker(ui, password, salt, params));

        let remaining = max_attempts - attempt;
        match outcome {
            Ok(()) => {
                debug!(attempt, "unlocked");
                return Ok(());
            }
            Err(VaultError::WrongPassword) if remaining > 0 => {
                let message = format!(
                    "Incorrect master password. {} attempt(s) remaining.",
                    remaining
                );
                writeln!(out, "{}", badge(ui, Badge::Warn, &message))?;
            }
            Err(VaultError::WrongPassword) => {}
            Err(err) => return Err(err.into()),
        }
    }

    Err(CliError::auth_failed_with_hint(
        "Incorrect master password.",
        "Hint: Too many failed attempts.",
    )
    .into())
}
