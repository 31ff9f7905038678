use anyhow::Result;
use cadence_core::models::NewTaskData;
use owo_colors::{OwoColorize, Style};
use uuid::Uuid;

use crate::cli::AddCommand;
use crate::commands::CommandContext;
use crate::parser::parse_optional;
use crate::util::{parse_id, print_json};

pub async fn add_task(ctx: &CommandContext, command: AddCommand) -> Result<()> {
    let due_at = parse_optional(command.due.as_deref(), ctx.service.now())?;
    let project_id = match command.project.as_deref() {
        Some(project) => parse_id(project, "project")?,
        None => Uuid::nil(),
    };

    let new_task_data = NewTaskData {
        project_id,
        title: command.title,
        description: command.description,
        due_at,
        repeat_every: command.every,
        repeat_unit: command.unit,
    };

    let added_task = ctx.service.create_task(ctx.owner, new_task_data).await?;
    if ctx.json {
        return print_json(&added_task);
    }

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    let subtle_style = Style::new().bright_black();

    if let Some(rule) = added_task.rule() {
        println!(
            "{} Created recurring task: {}",
            "✓".style(success_style),
            added_task.title.bright_white().bold()
        );
        println!("  {} Task ID: {}", "→".style(info_style), added_task.id.to_string().yellow());
        println!("  {} Repeats {}", "→".style(info_style), rule.to_string().cyan());
        if let Some(next_due_at) = added_task.next_due_at {
            println!(
                "  {} Next due: {}",
                "→".style(info_style),
                next_due_at.format("%Y-%m-%d %H:%M").to_string().cyan()
            );
        }
        println!("\n{} Next steps:", "💡".style(subtle_style));
        println!(
            "   {} Upcoming occurrences: cadence occurrences {}",
            "•".style(subtle_style),
            added_task.id.to_string().yellow()
        );
    } else {
        println!(
            "{} Created task: {}",
            "✓".style(success_style),
            added_task.title.bright_white().bold()
        );
        println!("  {} Task ID: {}", "→".style(info_style), added_task.id.to_string().yellow());
        if let Some(due_at) = added_task.due_at {
            println!(
                "  {} Due: {}",
                "→".style(info_style),
                due_at.format("%Y-%m-%d %H:%M").to_string().cyan()
            );
        }
    }

    Ok(())
}
