//! # Cadence Core Library
//!
//! The recurring-task occurrence engine: given a task with a repeat rule
//! (every N days, weeks or months) it deterministically generates occurrence
//! instances over a time window, persists them idempotently, tracks their
//! completion and keeps the task's `next_due_at` pointer in step.
//!
//! ## Features
//!
//! - **Pure Generation**: occurrences are computed from the anchor with
//!   calendar-correct month arithmetic, independent of any storage
//! - **Idempotent Materialization**: one row per `(task, due time)`, with ids
//!   that stay stable across overlapping queries
//! - **Uniform Not-Found**: missing, foreign and non-recurring tasks are
//!   indistinguishable to callers
//! - **Per-Task Serialization**: completions and `next_due_at` recomputation
//!   never race within a task
//! - **Injectable Clock**: "now" always comes from a [`clock::Clock`]
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection, migrations and transient-failure retry
//! - [`models`]: Core data structures and transfer objects
//! - [`rule`]: Repeat rule validation
//! - [`generator`]: Occurrence generation
//! - [`repository`]: Data access layer: read traits plus transaction-scoped writes
//! - [`service`]: The recurrence service orchestrating the above
//! - [`error`]: Error taxonomy
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::{
//!     db, models::{MaterializationConfig, NewTaskData, OccurrenceWindow},
//!     repository::SqliteRepository, service::RecurrenceService,
//! };
//! use chrono::{TimeZone, Utc};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cadence_core::error::CoreError> {
//!     let pool = db::establish_connection("cadence.db").await?;
//!     let service = RecurrenceService::with_system_clock(
//!         SqliteRepository::new(pool),
//!         MaterializationConfig::default(),
//!     );
//!
//!     let owner = Uuid::now_v7();
//!     let task = service
//!         .create_task(owner, NewTaskData {
//!             project_id: Uuid::now_v7(),
//!             title: "Water the plants".to_string(),
//!             due_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
//!             repeat_every: Some(1),
//!             repeat_unit: Some("day".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let window = OccurrenceWindow::new(None, Some(Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()));
//!     let occurrences = service.list_occurrences(owner, task.id, window).await?;
//!     println!("{} occurrences", occurrences.len());
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod db;
pub mod error;
pub mod generator;
pub mod locks;
pub mod models;
pub mod repository;
pub mod rule;
pub mod service;
