//! Password prompts and line-oriented note input.

use std::io::{self, BufRead};

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::constants::{END_OF_NOTE, PASSPHRASE_ENV};

/// Read `SEALNOTE_PASSPHRASE` if it holds a non-blank value.
pub fn env_passphrase() -> Option<SecretString> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

/// Prompt for the master password on the terminal.
pub fn prompt_passphrase() -> anyhow::Result<SecretString> {
    Password::new()
        .with_prompt("Master password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a new master password with confirmation (for init), or read
/// it from `SEALNOTE_PASSPHRASE`.
pub fn prompt_init_passphrase(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = env_passphrase() {
        return Ok(value);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ));
    }
    Password::new()
        .with_prompt("New master password")
        .with_confirmation("Confirm master password", "Passwords do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Read one line without its trailing newline. `None` at end of input.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Collect note content until a line holding only `.` or end of input.
///
/// The body and every line buffer are wiped when dropped.
pub fn read_note_body<R: BufRead>(reader: &mut R) -> io::Result<Zeroizing<String>> {
    let mut body = Zeroizing::new(String::new());
    let mut line = Zeroizing::new(String::new());
    let mut first = true;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let content = line.trim_end_matches(['\n', '\r']);
        if content == END_OF_NOTE {
            break;
        }
        if !first {
            body.push('\n');
        }
        body.push_str(content);
        first = false;
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_strips_newlines() {
        let mut input = Cursor::new("one\r\ntwo\n");
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("one"));
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("two"));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn test_note_body_stops_at_dot() {
        let mut input = Cursor::new("first\nsecond\n.\nnext command\n");
        let body: Zeroizing<String> = read_note_body(&mut input).unwrap();
        assert_eq!(body.as_str(), "first\nsecond");
        assert_eq!(
            read_line(&mut input).unwrap().as_deref(),
            Some("next command")
        );
    }

    #[test]
    fn test_note_body_ends_at_eof() {
        let mut input = Cursor::new("only line");
        assert_eq!(read_note_body(&mut input).unwrap().as_str(), "only line");
    }

    #[test]
    fn test_dot_inside_line_is_content() {
        let mut input = Cursor::new(" .\n..\n.\n");
        assert_eq!(read_note_body(&mut input).unwrap().as_str(), " .\n..");
    }

    #[test]
    fn test_blank_lines_and_crlf_in_body() {
        let mut input = Cursor::new("a\r\n\r\nb\r\n.\r\n");
        assert_eq!(read_note_body(&mut input).unwrap().as_str(), "a\n\nb");
    }

    #[test]
    fn test_empty_body() {
        let mut input = Cursor::new(".\n");
        assert!(read_note_body(&mut input).unwrap().is_empty());
    }
}
