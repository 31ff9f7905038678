use anyhow::Result;

use crate::cli::ShowCommand;
use crate::commands::CommandContext;
use crate::util::{parse_id, print_json};
use crate::views::table::display_task;

pub async fn show_task(ctx: &CommandContext, command: ShowCommand) -> Result<()> {
    let task_id = parse_id(&command.id, "task")?;
    let task = ctx.service.get_task(ctx.owner, task_id).await?;

    if ctx.json {
        return print_json(&task);
    }
    display_task(&task);
    Ok(())
}
