use anyhow::Result;
use cadence_core::models::OccurrenceWindow;

use crate::cli::OccurrencesCommand;
use crate::commands::CommandContext;
use crate::parser::parse_optional;
use crate::util::{parse_id, print_json};
use crate::views::table::display_occurrences;

pub async fn list_occurrences(ctx: &CommandContext, command: OccurrencesCommand) -> Result<()> {
    let task_id = parse_id(&command.task_id, "task")?;
    let now = ctx.service.now();
    let window = OccurrenceWindow::new(
        parse_optional(command.from.as_deref(), now)?,
        parse_optional(command.to.as_deref(), now)?,
    );

    let occurrences = ctx.service.list_occurrences(ctx.owner, task_id, window).await?;
    if ctx.json {
        return print_json(&occurrences);
    }
    display_occurrences(&occurrences);
    Ok(())
}
