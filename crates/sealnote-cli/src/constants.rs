//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (vault, note).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable holding the master password for scripted use.
pub const PASSPHRASE_ENV: &str = "SEALNOTE_PASSPHRASE";

/// Environment variable with a tracing filter directive.
pub const LOG_ENV: &str = "SEALNOTE_LOG";

/// Line that ends multi-line note input.
pub const END_OF_NOTE: &str = ".";

/// Default number of password attempts before giving up.
pub const DEFAULT_MAX_UNLOCK_ATTEMPTS: u32 = 3;
