use crate::app::AppContext;
use crate::errors::from_vault_error;
use crate::ui::notes_table;

pub fn handle_list(ctx: &AppContext) -> anyhow::Result<()> {
    let service = ctx.open_unlocked()?;
    let notes = service
        .list()
        .map_err(|err| from_vault_error(err, &ctx.vault_path_display()))?;
    println!("{}", notes_table(ctx.ui(), &notes));
    Ok(())
}

pub fn handle_view(ctx: &AppContext, name: &str) -> anyhow::Result<()> {
    let service = ctx.open_unlocked()?;
    let note = service
        .view(name)
        .map_err(|err| from_vault_error(err, &ctx.vault_path_display()))?;
    println!("{}", note.body.as_str());
    Ok(())
}
