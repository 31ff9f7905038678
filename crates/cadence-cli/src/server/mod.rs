//! REST surface of the engine.
//!
//! | method | path | |
//! |---|---|---|
//! | GET | `/api/v1/health` | liveness |
//! | GET | `/api/v1/ready` | database reachable |
//! | GET | `/api/v1/version` | crate version |
//! | POST, GET | `/api/v1/projects/{project_id}/tasks` | create / list tasks |
//! | GET, DELETE | `/api/v1/tasks/{task_id}` | read / delete a task |
//! | GET | `/api/v1/tasks/{task_id}/occurrences?from=&to=` | list occurrences |
//! | PATCH | `/api/v1/tasks/{task_id}/occurrences/{occurrence_id}` | set completion |
//! | GET | `/api/v1/agenda?from=&to=` | what is due |
//!
//! Every task route requires the caller's id in the `X-User-Id` header.

use axum::routing::{get, patch, post};
use axum::Router;
use cadence_core::clock::{Clock, SystemClock};
use cadence_core::service::RecurrenceService;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod handlers;

/// Shared application dependencies.
pub struct AppState<C: Clock = SystemClock> {
    pub service: Arc<RecurrenceService<C>>,
}

impl<C: Clock> AppState<C> {
    pub fn new(service: Arc<RecurrenceService<C>>) -> Self {
        Self { service }
    }
}

impl<C: Clock> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

pub fn router<C: Clock + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/ready", get(handlers::ready::<C>))
        .route("/api/v1/version", get(handlers::version))
        .route(
            "/api/v1/projects/:project_id/tasks",
            post(handlers::create_task::<C>).get(handlers::list_project_tasks::<C>),
        )
        .route(
            "/api/v1/tasks/:task_id",
            get(handlers::get_task::<C>).delete(handlers::delete_task::<C>),
        )
        .route("/api/v1/tasks/:task_id/occurrences", get(handlers::list_occurrences::<C>))
        .route(
            "/api/v1/tasks/:task_id/occurrences/:occurrence_id",
            patch(handlers::complete_occurrence::<C>),
        )
        .route("/api/v1/agenda", get(handlers::agenda::<C>))
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
