use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::CompleteCommand;
use crate::commands::CommandContext;
use crate::util::{parse_id, print_json};

pub async fn complete_occurrence(ctx: &CommandContext, command: CompleteCommand) -> Result<()> {
    let task_id = parse_id(&command.task_id, "task")?;
    let occurrence_id = parse_id(&command.occurrence_id, "occurrence")?;

    let occurrence = ctx
        .service
        .complete_occurrence(ctx.owner, task_id, occurrence_id, !command.undo)
        .await?;
    if ctx.json {
        return print_json(&occurrence);
    }

    let due = occurrence.due_at.format("%Y-%m-%d %H:%M").to_string();
    if occurrence.completed {
        println!("{} Completed occurrence due {}", "✓".green().bold(), due.cyan());
    } else {
        println!("Reopened occurrence due {}", due.cyan());
    }

    let task = ctx.service.get_task(ctx.owner, task_id).await?;
    match task.next_due_at {
        Some(next_due_at) => println!("  → Next due: {}", next_due_at.format("%Y-%m-%d %H:%M").to_string().cyan()),
        None => println!("  → No upcoming occurrences"),
    }
    Ok(())
}
