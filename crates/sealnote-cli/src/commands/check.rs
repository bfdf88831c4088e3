use crate::app::AppContext;
use crate::errors::{from_vault_error, CliError};
use crate::ui::{badge, hint, Badge};

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let service = ctx.open_unlocked()?;
    let report = service
        .check()
        .map_err(|err| from_vault_error(err, &ctx.vault_path_display()))?;

    if report.is_ok() {
        if !ctx.quiet() {
            println!(
                "{}",
                badge(
                    ctx.ui(),
                    Badge::Ok,
                    &format!("Integrity check: {} note(s) OK", report.checked)
                )
            );
        }
        return Ok(());
    }

    eprintln!(
        "{}",
        badge(ctx.ui(), Badge::Err, "Integrity check: FAILED")
    );
    for (name, reason) in &report.failures {
        eprintln!("- {}: {}", name, reason);
    }
    eprintln!(
        "{}",
        hint(ctx.ui(), "Restore the listed notes from a backup.")
    );
    Err(CliError::IntegrityFailed(format!(
        "{} of {} note(s) failed the integrity check",
        report.failures.len(),
        report.checked
    ))
    .into())
}
