use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sealnote_core::VERSION;

/// SealNote - encrypted notes behind a master password
#[derive(Parser)]
#[command(name = "sealnote")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault directory
    #[arg(long, global = true, env = "SEALNOTE_VAULT")]
    pub vault: Option<String>,

    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the vault will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Do not write the vault path to the config file
    #[arg(long)]
    pub no_config: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new encrypted vault
    Init(InitArgs),

    /// Start the interactive note shell (default)
    Shell,

    /// List notes
    List,

    /// Print a note
    View {
        /// Note name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Verify that every note decrypts and authenticates
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}
