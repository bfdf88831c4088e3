use std::io;

use crate::app::{unlock_with_retry, AppContext, TerminalPrompt};
use crate::shell::Shell;

pub fn handle_shell(ctx: &AppContext) -> anyhow::Result<()> {
    let mut service = ctx.open_service()?;
    let mut prompt = TerminalPrompt::new();
    unlock_with_retry(
        &mut service,
        &mut prompt,
        ctx.ui(),
        &mut io::stderr(),
        ctx.max_unlock_attempts(),
    )?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(
        &mut service,
        stdin.lock(),
        stdout.lock(),
        prompt,
        ctx.ui().clone(),
        ctx.max_unlock_attempts(),
    )
    .run()
}
