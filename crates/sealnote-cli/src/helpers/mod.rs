//! Input helpers for the CLI.

mod input;

pub use input::{
    env_passphrase, prompt_init_passphrase, prompt_passphrase, read_line, read_note_body,
};
