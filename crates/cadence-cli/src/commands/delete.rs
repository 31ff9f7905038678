use anyhow::Result;
use dialoguer::Confirm;

use crate::cli::DeleteCommand;
use crate::commands::CommandContext;
use crate::util::{parse_id, print_json};

pub async fn delete_task(ctx: &CommandContext, command: DeleteCommand) -> Result<()> {
    let task_id = parse_id(&command.id, "task")?;
    let task = ctx.service.get_task(ctx.owner, task_id).await?;

    if !command.force {
        let prompt = if task.is_recurring() {
            format!("Delete recurring task '{}' and all of its occurrences?", task.title)
        } else {
            format!("Are you sure you want to delete task '{}'?", task.title)
        };
        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    ctx.service.delete_task(ctx.owner, task_id).await?;
    if ctx.json {
        return print_json(&serde_json::json!({ "deleted": task_id }));
    }
    println!("Deleted task: '{}'", task.title);
    Ok(())
}
