use anyhow::Result;
use cadence_core::models::OccurrenceWindow;

use crate::cli::AgendaCommand;
use crate::commands::CommandContext;
use crate::parser::parse_optional;
use crate::util::print_json;
use crate::views::table::display_agenda;

pub async fn show_agenda(ctx: &CommandContext, command: AgendaCommand) -> Result<()> {
    let now = ctx.service.now();
    let window = OccurrenceWindow::new(
        parse_optional(command.from.as_deref(), now)?,
        parse_optional(command.to.as_deref(), now)?,
    );

    let items = ctx.service.agenda(ctx.owner, window).await?;
    if ctx.json {
        return print_json(&items);
    }
    display_agenda(&items);
    Ok(())
}
