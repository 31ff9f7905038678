use anyhow::{Context, Result};
use std::sync::Arc;

use crate::cli::ServeCommand;
use crate::commands::CommandContext;
use crate::config::Config;
use crate::server;

pub async fn serve(ctx: &CommandContext, command: ServeCommand, config: &Config) -> Result<()> {
    let bind = command.bind.as_deref().unwrap_or(&config.bind);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!(addr = %listener.local_addr()?, "REST API listening");
    let app = server::router(server::AppState::new(Arc::clone(&ctx.service)));

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}
