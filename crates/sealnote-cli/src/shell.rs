//! Interactive note shell.
//!
//! Reads one command per line and reports every vault error as a message,
//! so only I/O failures on the shell's own streams end the loop early.

use std::io::{BufRead, Write};

use sealnote_core::{NoteName, NoteService, VaultError, VaultStore};
use tracing::debug;
use zeroize::Zeroizing;

use crate::app::{unlock_with_retry, PassphrasePrompt};
use crate::constants::END_OF_NOTE;
use crate::helpers::{read_line, read_note_body};
use crate::ui::{alarm_message, badge, error_message, notes_table, Badge, UiContext};

const COMMAND_PROMPT: &str =
    "Enter command (new / edit / view / del / list / lock / unlock / help / quit):";

const HELP: &[(&str, &str)] = &[
    ("new", "create a note"),
    ("edit", "replace the contents of a note"),
    ("view", "print a note"),
    ("del", "delete a note"),
    ("list", "list notes"),
    ("lock", "forget the key until `unlock`"),
    ("unlock", "enter the master password again"),
    ("help", "show this help"),
    ("quit", "lock and exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    New,
    Edit,
    View,
    Del,
    List,
    Lock,
    Unlock,
    Help,
    Quit,
    Invalid(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "new" => Self::New,
            "edit" => Self::Edit,
            "view" => Self::View,
            "del" => Self::Del,
            "list" => Self::List,
            "lock" => Self::Lock,
            "unlock" => Self::Unlock,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Invalid(line.trim().to_string()),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a, S, R, W, P>
where
    S: VaultStore,
{
    service: &'a mut NoteService<S>,
    input: R,
    output: W,
    prompt: P,
    ui: UiContext,
    max_attempts: u32,
}

impl<'a, S, R, W, P> Shell<'a, S, R, W, P>
where
    S: VaultStore,
    R: BufRead,
    W: Write,
    P: PassphrasePrompt,
{
    pub fn new(
        service: &'a mut NoteService<S>,
        input: R,
        output: W,
        prompt: P,
        ui: UiContext,
        max_attempts: u32,
    ) -> Self {
        Self {
            service,
            input,
            output,
            prompt,
            ui,
            max_attempts,
        }
    }

    /// Run until `quit` or end of input. The session is locked on return.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let result = self.command_loop();
        self.service.lock();
        result
    }

    fn command_loop(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "{}", COMMAND_PROMPT)?;
            self.output.flush()?;

            let Some(line) = read_line(&mut self.input)? else {
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            if let Flow::Quit = self.execute(ShellCommand::parse(&line))? {
                return Ok(());
            }
        }
    }

    fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        match command {
            ShellCommand::New => self.new_note(),
            ShellCommand::Edit => self.edit_note(),
            ShellCommand::View => self.view_note(),
            ShellCommand::Del => self.delete_note(),
            ShellCommand::List => {
                match self.service.list() {
                    Ok(notes) => {
                        let table = notes_table(&self.ui, &notes);
                        writeln!(self.output, "{}", table)?;
                    }
                    Err(err) => self.report(&err)?,
                }
                Ok(Flow::Continue)
            }
            ShellCommand::Lock => {
                self.service.lock();
                self.say(Badge::Ok, "Vault locked.")?;
                Ok(Flow::Continue)
            }
            ShellCommand::Unlock => self.unlock(),
            ShellCommand::Help => {
                for (name, text) in HELP {
                    writeln!(self.output, "  {:<8} {}", name, text)?;
                }
                Ok(Flow::Continue)
            }
            ShellCommand::Quit => Ok(Flow::Quit),
            ShellCommand::Invalid(input) => {
                debug!(command = %input, "invalid command");
                writeln!(self.output, "Invalid command.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn new_note(&mut self) -> anyhow::Result<Flow> {
        if !self.ensure_unlocked()? {
            return Ok(Flow::Continue);
        }
        let Some(name) = self.ask("Note name:")? else {
            return Ok(Flow::Quit);
        };
        // Reject bad or taken names before the user types the body.
        let checked = NoteName::new(name.as_str()).and_then(|note| {
            if self.service.store().contains(&note)? {
                Err(VaultError::AlreadyExists(note.to_string()))
            } else {
                Ok(note)
            }
        });
        if let Err(err) = checked {
            self.report(&err)?;
            return Ok(Flow::Continue);
        }

        let body = self.ask_body()?;
        match self.service.create(&name, &body) {
            Ok(summary) => self.say(Badge::Ok, &format!("Saved note '{}'.", summary.name))?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn edit_note(&mut self) -> anyhow::Result<Flow> {
        if !self.ensure_unlocked()? {
            return Ok(Flow::Continue);
        }
        let Some(name) = self.ask("Note name:")? else {
            return Ok(Flow::Quit);
        };
        match self.service.view(&name) {
            Ok(note) => {
                writeln!(self.output, "Current contents:")?;
                writeln!(self.output, "{}", note.body.as_str())?;
            }
            Err(err) => {
                self.report(&err)?;
                return Ok(Flow::Continue);
            }
        }

        let body = self.ask_body()?;
        match self.service.edit(&name, &body) {
            Ok(summary) => self.say(Badge::Ok, &format!("Updated note '{}'.", summary.name))?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn view_note(&mut self) -> anyhow::Result<Flow> {
        if !self.ensure_unlocked()? {
            return Ok(Flow::Continue);
        }
        let Some(name) = self.ask("Note name:")? else {
            return Ok(Flow::Quit);
        };
        match self.service.view(&name) {
            Ok(note) => writeln!(self.output, "{}", note.body.as_str())?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_note(&mut self) -> anyhow::Result<Flow> {
        if !self.ensure_unlocked()? {
            return Ok(Flow::Continue);
        }
        let Some(name) = self.ask("Note name:")? else {
            return Ok(Flow::Quit);
        };
        match self.service.delete(&name) {
            Ok(()) => self.say(Badge::Ok, &format!("Deleted note '{}'.", name.trim()))?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn unlock(&mut self) -> anyhow::Result<Flow> {
        if self.service.is_unlocked() {
            self.say(Badge::Info, "Vault is already unlocked.")?;
            return Ok(Flow::Continue);
        }
        match unlock_with_retry(
            &mut *self.service,
            &mut self.prompt,
            &self.ui,
            &mut self.output,
            self.max_attempts,
        ) {
            Ok(()) => self.say(Badge::Ok, "Vault unlocked.")?,
            Err(err) => {
                let message = err.to_string();
                let head = message.lines().next().unwrap_or("Unlock failed.");
                let rendered = error_message(&self.ui, head, None);
                writeln!(self.output, "{}", rendered)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn ensure_unlocked(&mut self) -> anyhow::Result<bool> {
        if self.service.is_unlocked() {
            return Ok(true);
        }
        self.report(&VaultError::NotUnlocked)?;
        Ok(false)
    }

    fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        writeln!(self.output, "{}", label)?;
        self.output.flush()?;
        Ok(read_line(&mut self.input)?.map(|line| line.trim().to_string()))
    }

    fn ask_body(&mut self) -> anyhow::Result<Zeroizing<String>> {
        writeln!(
            self.output,
            "Enter note content, then a line with only '{}':",
            END_OF_NOTE
        )?;
        self.output.flush()?;
        Ok(read_note_body(&mut self.input)?)
    }

    fn say(&mut self, kind: Badge, message: &str) -> anyhow::Result<()> {
        let line = badge(&self.ui, kind, message);
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn report(&mut self, err: &VaultError) -> anyhow::Result<()> {
        let rendered = match err {
            VaultError::AuthenticationFailure => alarm_message(
                &self.ui,
                "Note failed authentication.",
                "The note file may be corrupted or tampered with. Restore it from a backup.",
            ),
            VaultError::WrongPassword => {
                error_message(&self.ui, "Incorrect master password.", None)
            }
            VaultError::NotUnlocked => {
                error_message(&self.ui, "Vault is locked.", Some("Run `unlock` first."))
            }
            VaultError::NotFound(name) => error_message(
                &self.ui,
                &format!("Note not found: {}", name),
                Some("Run `list` to see your notes."),
            ),
            VaultError::AlreadyExists(name) => error_message(
                &self.ui,
                &format!("A note named '{}' already exists.", name),
                Some("Use `edit` to change it."),
            ),
            VaultError::InvalidInput(message) => error_message(&self.ui, message, None),
            other => error_message(&self.ui, &other.to_string(), None),
        };
        writeln!(self.output, "{}", rendered)?;
        Ok(())
    }
}
