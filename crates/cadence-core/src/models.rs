use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::rule::{RecurrenceRule, RepeatUnit};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Anchor of the series for recurring tasks, plain due date otherwise.
    pub due_at: Option<DateTime<Utc>>,
    pub repeat_every: Option<i64>,
    pub repeat_unit: Option<RepeatUnit>,
    /// Due time of the earliest pending occurrence at or after "now".
    /// Maintained by the engine; always null for plain tasks.
    pub next_due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.repeat_every.is_some() && self.repeat_unit.is_some()
    }

    /// The task's rule, if it has a complete and valid one.
    pub fn rule(&self) -> Option<RecurrenceRule> {
        match (self.repeat_every, self.repeat_unit) {
            (Some(every), Some(unit)) => RecurrenceRule::new(every, unit).ok(),
            _ => None,
        }
    }
}

/// Draft of a task as submitted by a caller, recurrence fields still raw.
#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub repeat_every: Option<i64>,
    pub repeat_unit: Option<String>,
}

/// One concrete scheduled instance of a recurring task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Occurrence {
    pub id: Uuid,
    pub task_id: Uuid,
    pub due_at: DateTime<Utc>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, default)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub updated_at: DateTime<Utc>,
}

/// Optional bounds of a listing; missing bounds are resolved by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccurrenceWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl OccurrenceWindow {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AgendaKind {
    Task,
    Occurrence,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgendaItem {
    pub kind: AgendaKind,
    pub task_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_id: Option<Uuid>,
    pub project_id: Uuid,
    pub title: String,
    pub due_at: DateTime<Utc>,
}

/// Backoff policy for units of work that failed on storage contention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 25,
        }
    }
}

/// Configuration for materialization behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MaterializationConfig {
    /// How far past "now" occurrences are kept materialized, in days
    pub horizon_days: i64,
    /// Cap on candidates generated (and rows returned) per request
    pub max_occurrences_per_request: usize,
    /// Widest agenda window accepted, in days
    pub agenda_max_window_days: i64,
    pub retry: RetryPolicy,
}

impl MaterializationConfig {
    pub fn horizon(&self) -> Duration {
        Duration::try_days(self.horizon_days).unwrap_or(Duration::MAX)
    }

    pub fn agenda_max_window(&self) -> Duration {
        Duration::try_days(self.agenda_max_window_days).unwrap_or(Duration::MAX)
    }
}

impl Default for MaterializationConfig {
    fn default() -> Self {
        Self {
            horizon_days: 60,
            max_occurrences_per_request: 1000,
            agenda_max_window_days: 180,
            retry: RetryPolicy::default(),
        }
    }
}
