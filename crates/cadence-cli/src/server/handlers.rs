use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cadence_core::clock::Clock;
use cadence_core::models::{AgendaItem, NewTaskData, Occurrence, OccurrenceWindow, Task};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::auth::Requester;
use super::error::ApiError;
use super::AppState;

/// Body of `POST /projects/{project_id}/tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub repeat_every: Option<i64>,
    pub repeat_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteOccurrenceRequest {
    pub completed: bool,
}

/// `?from=&to=`, both optional RFC 3339 timestamps.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl From<WindowQuery> for OccurrenceWindow {
    fn from(query: WindowQuery) -> Self {
        OccurrenceWindow::new(query.from, query.to)
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn ready<C: Clock + 'static>(State(state): State<AppState<C>>) -> (StatusCode, Json<Value>) {
    match state.service.repository().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ready": true }))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "ready": false })))
        }
    }
}

pub async fn fallback() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn create_task<C: Clock + 'static>(
    State(state): State<AppState<C>>,
    Requester(owner): Requester,
    project_id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Path(project_id) = project_id?;
    let Json(request) = body?;

    let data = NewTaskData {
        project_id,
        title: request.title,
        description: request.description,
        due_at: request.due_at,
        repeat_every: request.repeat_every,
        repeat_unit: request.repeat_unit,
    };
    let task = state.service.create_task(owner, data).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_project_tasks<C: Clock + 'static>(
    State(state): State<AppState<C>>,
    Requester(owner): Requester,
    project_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Path(project_id) = project_id?;
    let tasks = state.service.list_project_tasks(owner, project_id).await?;
    Ok(Json(tasks))
}

pub async fn get_task<C: Clock + 'static>(
    State(state): State<AppState<C>>,
    Requester(owner): Requester,
    task_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path(task_id) = task_id?;
    let task = state.service.get_task(owner, task_id).await?;
    Ok(Json(task))
}

pub async fn delete_task<C: Clock + 'static>(
    State(state): State<AppState<C>>,
    Requester(owner): Requester,
    task_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(task_id) = task_id?;
    state.service.delete_task(owner, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_occurrences<C: Clock + 'static>(
    State(state): State<AppState<C>>,
    Requester(owner): Requester,
    task_id: Result<Path<Uuid>, PathRejection>,
    window: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<Vec<Occurrence>>, ApiError> {
    let Path(task_id) = task_id?;
    let Query(window) = window?;
    let occurrences = state.service.list_occurrences(owner, task_id, window.into()).await?;
    Ok(Json(occurrences))
}

pub async fn complete_occurrence<C: Clock + 'static>(
    State(state): State<AppState<C>>,
    Requester(owner): Requester,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Result<Json<CompleteOccurrenceRequest>, JsonRejection>,
) -> Result<Json<Occurrence>, ApiError> {
    let Path((task_id, occurrence_id)) = ids?;
    let Json(request) = body?;
    let occurrence = state
        .service
        .complete_occurrence(owner, task_id, occurrence_id, request.completed)
        .await?;
    Ok(Json(occurrence))
}

pub async fn agenda<C: Clock + 'static>(
    State(state): State<AppState<C>>,
    Requester(owner): Requester,
    window: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<Vec<AgendaItem>>, ApiError> {
    let Query(window) = window?;
    let items = state.service.agenda(owner, window.into()).await?;
    Ok(Json(items))
}
