//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

/// Filter directive for a `-v` count.
fn default_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    format!("sealnote_core={level},sealnote={level},warn")
}

/// Install the global subscriber, writing to stderr.
///
/// `SEALNOTE_LOG` overrides the verbosity flags.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
