//! SealNote CLI - encrypted notes behind a master password
//!
//! This is the command-line interface for SealNote. It wraps the core
//! library's vault and session in an interactive shell and a few one-shot
//! commands.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod shell;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{check, init, misc, notes, shell as shell_cmd};
use crate::errors::CliError;
use crate::logging::init_tracing;
use crate::ui::{error_message, UiContext};

fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.quiet { 0 } else { cli.verbose });

    if let Err(err) = run(&cli) {
        let ui = UiContext::from_env(cli.no_color);
        let code = err
            .downcast_ref::<CliError>()
            .map(CliError::exit_code)
            .unwrap_or(1);

        let text = format!("{:#}", err);
        let (message, hint) = split_hint(&text);
        eprintln!("{}", error_message(&ui, message, hint));
        std::process::exit(code);
    }
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(text: &str) -> (&str, Option<&str>) {
    match text.find("\nHint:") {
        Some(idx) => (
            &text[..idx],
            Some(text[idx + "\nHint:".len()..].trim_start()),
        ),
        None => (text, None),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Completions need neither config nor vault.
    if let Some(Commands::Completions { shell }) = &cli.command {
        return misc::handle_completions(*shell);
    }

    let ctx = AppContext::new(cli)?;
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(&ctx, args),
        None | Some(Commands::Shell) => shell_cmd::handle_shell(&ctx),
        Some(Commands::List) => notes::handle_list(&ctx),
        Some(Commands::View { name }) => notes::handle_view(&ctx, name),
        Some(Commands::Check) => check::handle_check(&ctx),
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hint() {
        let (message, hint) = split_hint("No vault found\nHint: Run `sealnote init`.");
        assert_eq!(message, "No vault found");
        assert_eq!(hint, Some("Run `sealnote init`."));

        assert_eq!(split_hint("plain"), ("plain", None));
    }
}
