use anyhow::Result;

use crate::cli::ListCommand;
use crate::commands::CommandContext;
use crate::util::{parse_id, print_json};
use crate::views::table::display_tasks;

pub async fn list_tasks(ctx: &CommandContext, command: ListCommand) -> Result<()> {
    let tasks = match command.project.as_deref() {
        Some(project) => {
            let project_id = parse_id(project, "project")?;
            ctx.service.list_project_tasks(ctx.owner, project_id).await?
        }
        None => ctx.service.list_tasks(ctx.owner).await?,
    };

    if ctx.json {
        return print_json(&tasks);
    }
    display_tasks(&tasks);
    Ok(())
}
