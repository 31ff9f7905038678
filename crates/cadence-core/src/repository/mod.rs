use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{AgendaItem, Task};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod occurrences;
pub mod tasks;

// Read-side traits live here; transaction-scoped writes are inherent methods
// on `SqliteRepository` in the domain modules so the service can compose them
// inside a single unit of work.

/// Task collaborator. Every lookup is scoped to the requesting owner.
#[async_trait]
pub trait TaskRepository {
    async fn find_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, CoreError>;
    async fn find_project_tasks(&self, owner_id: Uuid, project_id: Uuid) -> Result<Vec<Task>, CoreError>;
    async fn find_recurring_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, CoreError>;
    /// Plain (non-recurring) tasks whose `due_at` lies in `[from, to]`.
    async fn find_due_tasks(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, CoreError>;
    async fn delete_task(&self, owner_id: Uuid, id: Uuid) -> Result<(), CoreError>;
}

/// Occurrence store reads.
#[async_trait]
pub trait OccurrenceRepository {
    /// Pending occurrences of the owner's recurring tasks in `[from, to]`,
    /// already shaped as agenda entries.
    async fn find_pending_agenda_items(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AgendaItem>, CoreError>;
}

/// SQLite implementation of the repository pattern
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Round-trips a trivial statement; used by readiness probes.
    pub async fn ping(&self) -> Result<(), CoreError> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }
}

/// SQLite binds integers as i64; limits beyond that are effectively unbounded.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
