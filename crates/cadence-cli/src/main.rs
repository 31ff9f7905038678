use anyhow::{Context, Result};
use cadence_core::db;
use cadence_core::error::CoreError;
use cadence_core::repository::SqliteRepository;
use cadence_core::service::RecurrenceService;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;
mod config;
mod parser;
mod server;
mod util;
mod views;

use commands::CommandContext;

/// `CADENCE_LOG` takes an env-filter directive, `CADENCE_LOG_FORMAT=json`
/// switches to one JSON object per line. Logs go to stderr so `--json`
/// output stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CADENCE_LOG").unwrap_or_else(|_| EnvFilter::new("cadence=info,warn"));
    let json = std::env::var("CADENCE_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = cli::Cli::parse();

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let config = config::Config::new().context("invalid configuration")?;
    tracing::debug!(database = %config.database_path.display(), "opening database");

    let pool = db::establish_connection(&config.database_path).await?;
    let service = RecurrenceService::with_system_clock(SqliteRepository::new(pool), config.materialization.clone());
    let ctx = CommandContext {
        service: Arc::new(service),
        owner: config.user_id,
        json: cli.json,
    };

    match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&ctx, command).await,
        cli::Commands::Show(command) => commands::show::show_task(&ctx, command).await,
        cli::Commands::List(command) => commands::list::list_tasks(&ctx, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_task(&ctx, command).await,
        cli::Commands::Occurrences(command) => commands::occurrences::list_occurrences(&ctx, command).await,
        cli::Commands::Complete(command) => commands::complete::complete_occurrence(&ctx, command).await,
        cli::Commands::Agenda(command) => commands::agenda::show_agenda(&ctx, command).await,
        cli::Commands::Serve(command) => commands::serve::serve(&ctx, command, &config).await,
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} {}", "Error:".style(error_style), s);
        }
        Some(CoreError::Validation(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
