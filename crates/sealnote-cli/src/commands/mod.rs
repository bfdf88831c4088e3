//! Handlers for the one-shot subcommands and the shell entry point.

pub mod check;
pub mod init;
pub mod misc;
pub mod notes;
pub mod shell;
