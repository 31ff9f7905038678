use cadence_core::models::{AgendaItem, AgendaKind, Occurrence, Task};
use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Relative due time, red when overdue and yellow when due today.
fn due_cell(due_at: Option<DateTime<Utc>>, pending: bool, now: DateTime<Utc>) -> Cell {
    let Some(due_at) = due_at else {
        return Cell::new("None");
    };

    let text = format!("{} ({})", due_at.format("%Y-%m-%d %H:%M"), due_at.humanize());
    if !pending {
        Cell::new(text)
    } else if due_at < now {
        Cell::new(text).fg(Color::Red)
    } else if due_at.date_naive() == now.date_naive() {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text)
    }
}

fn repeat_text(task: &Task) -> String {
    task.rule().map_or_else(|| "-".to_string(), |rule| rule.to_string())
}

pub fn display_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Repeats", "Due", "Next Due"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&task.id)));

        let mut title = String::new();
        if task.is_recurring() {
            title.push('↻');
            title.push(' ');
        }
        title.push_str(&task.title);
        row.add_cell(Cell::new(title));

        row.add_cell(Cell::new(repeat_text(task)));
        row.add_cell(due_cell(task.due_at, !task.is_recurring(), now));
        row.add_cell(due_cell(task.next_due_at, true, now));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_task(task: &Task) {
    let now = Utc::now();
    let mut table = Table::new();
    table.add_row(vec![Cell::new("ID").add_attribute(Attribute::Bold), Cell::new(task.id)]);
    table.add_row(vec![Cell::new("Title").add_attribute(Attribute::Bold), Cell::new(&task.title)]);
    table.add_row(vec![
        Cell::new("Description").add_attribute(Attribute::Bold),
        Cell::new(task.description.as_deref().unwrap_or("None")),
    ]);
    table.add_row(vec![Cell::new("Project").add_attribute(Attribute::Bold), Cell::new(task.project_id)]);
    table.add_row(vec![Cell::new("Repeats").add_attribute(Attribute::Bold), Cell::new(repeat_text(task))]);
    table.add_row(vec![
        Cell::new("Due").add_attribute(Attribute::Bold),
        due_cell(task.due_at, !task.is_recurring(), now),
    ]);
    if task.is_recurring() {
        table.add_row(vec![
            Cell::new("Next Due").add_attribute(Attribute::Bold),
            due_cell(task.next_due_at, true, now),
        ]);
    }
    table.add_row(vec![
        Cell::new("Created").add_attribute(Attribute::Bold),
        Cell::new(task.created_at.humanize()),
    ]);

    println!("{table}");
}

pub fn display_occurrences(occurrences: &[Occurrence]) {
    if occurrences.is_empty() {
        println!("No occurrences found.");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Due", "Status", "Completed"]);

    for occurrence in occurrences {
        let mut row = Row::new();
        row.add_cell(Cell::new(occurrence.id));
        row.add_cell(due_cell(Some(occurrence.due_at), !occurrence.completed, now));
        row.add_cell(if occurrence.completed {
            Cell::new("Completed").fg(Color::Green)
        } else {
            Cell::new("Pending")
        });
        row.add_cell(Cell::new(
            occurrence
                .completed_at
                .map_or_else(|| "-".to_string(), |at| at.humanize()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_agenda(items: &[AgendaItem]) {
    if items.is_empty() {
        println!("Nothing due.");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.set_header(vec!["Due", "Title", "Task", "Occurrence"]);

    for item in items {
        let mut row = Row::new();
        row.add_cell(due_cell(Some(item.due_at), true, now));
        let title = match item.kind {
            AgendaKind::Task => item.title.clone(),
            AgendaKind::Occurrence => format!("↻ {}", item.title),
        };
        row.add_cell(Cell::new(title));
        row.add_cell(Cell::new(short_id(&item.task_id)));
        row.add_cell(Cell::new(item.occurrence_id.map_or_else(|| "-".to_string(), |id| id.to_string())));
        table.add_row(row);
    }

    println!("{table}");
}
