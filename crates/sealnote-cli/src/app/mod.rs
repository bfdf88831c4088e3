//! Application-level utilities for the SealNote CLI.
//!
//! This module provides:
//! - Path resolution for config and vault directories
//! - An application context bundling args, config and UI settings
//! - Password handling with retry logic

mod context;
mod resolver;
mod unlock;

// Re-export public API
pub use context::AppContext;
pub use unlock::{unlock_with_retry, PassphrasePrompt, TerminalPrompt};
