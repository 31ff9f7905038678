use clap::{Parser, Subcommand};

/// Recurring task scheduler: plans occurrences, tracks completion and serves the REST API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit JSON output instead of human-readable tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task, optionally repeating
    Add(AddCommand),
    /// Show one task with its next due occurrence
    Show(ShowCommand),
    /// List tasks
    List(ListCommand),
    /// Delete a task and all of its occurrences
    Delete(DeleteCommand),
    /// List the occurrences of a recurring task
    Occurrences(OccurrencesCommand),
    /// Mark an occurrence as completed (or pending again with --undo)
    Complete(CompleteCommand),
    /// Show what is due: plain tasks and pending occurrences
    Agenda(AgendaCommand),
    /// Serve the REST API
    Serve(ServeCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// When the task is due; the anchor of a repeating task
    #[clap(long, help = "Due time, RFC 3339 or natural language (e.g. 'tomorrow 9am')")]
    pub due: Option<String>,
    /// The project the task belongs to
    #[clap(short, long)]
    pub project: Option<String>,
    /// Repeat interval, used together with --unit
    #[clap(long, help = "Repeat every N units (requires --unit)")]
    pub every: Option<i64>,
    /// Repeat unit, used together with --every
    #[clap(long, help = "Repeat unit: day, week or month")]
    pub unit: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the task
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only tasks of this project
    #[clap(short, long)]
    pub project: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct OccurrencesCommand {
    /// The ID of the recurring task
    pub task_id: String,
    /// Start of the window (defaults to now)
    #[clap(long)]
    pub from: Option<String>,
    /// End of the window (defaults to the materialization horizon)
    #[clap(long)]
    pub to: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompleteCommand {
    /// The ID of the recurring task
    pub task_id: String,
    /// The ID of the occurrence
    pub occurrence_id: String,
    /// Mark the occurrence as pending again
    #[clap(long)]
    pub undo: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AgendaCommand {
    /// Start of the window (defaults to one day ago)
    #[clap(long)]
    pub from: Option<String>,
    /// End of the window (defaults to one week ahead)
    #[clap(long)]
    pub to: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeCommand {
    /// Address to listen on, overriding the configured one
    #[clap(long)]
    pub bind: Option<String>,
}
