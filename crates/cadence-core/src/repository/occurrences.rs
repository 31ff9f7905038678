use crate::error::CoreError;
use crate::models::{AgendaItem, AgendaKind, Occurrence};
use crate::repository::{sql_limit, SqliteRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Sqlite, Transaction};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct PendingOccurrenceRow {
    id: Uuid,
    task_id: Uuid,
    project_id: Uuid,
    title: String,
    due_at: DateTime<Utc>,
}

impl From<PendingOccurrenceRow> for AgendaItem {
    fn from(row: PendingOccurrenceRow) -> Self {
        AgendaItem {
            kind: AgendaKind::Occurrence,
            task_id: row.task_id,
            occurrence_id: Some(row.id),
            project_id: row.project_id,
            title: row.title,
            due_at: row.due_at,
        }
    }
}

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    async fn find_pending_agenda_items(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AgendaItem>, CoreError> {
        let rows: Vec<PendingOccurrenceRow> = sqlx::query_as(
            r#"SELECT o.id, o.task_id, t.project_id, t.title, o.due_at
            FROM task_occurrences o
            JOIN tasks t ON t.id = o.task_id
            WHERE t.owner_id = $1
            AND o.completed = 0
            AND o.due_at >= $2 AND o.due_at <= $3
            ORDER BY o.due_at, o.task_id"#,
        )
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(AgendaItem::from).collect())
    }
}

impl SqliteRepository {
    /// Persists the given due times for a task, skipping any that already
    /// exist. Returns how many rows were created.
    pub(crate) async fn materialize_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        task_id: Uuid,
        due_times: &[DateTime<Utc>],
        now: DateTime<Utc>,
    ) -> Result<u64, CoreError> {
        let mut created = 0;
        for due_at in due_times {
            let result = sqlx::query(
                r#"INSERT INTO task_occurrences (id, task_id, due_at, completed, completed_at, created_at, updated_at)
                VALUES ($1, $2, $3, 0, NULL, $4, $4)
                ON CONFLICT (task_id, due_at) DO NOTHING"#,
            )
            .bind(Uuid::now_v7())
            .bind(task_id)
            .bind(due_at)
            .bind(now)
            .execute(&mut **tx)
            .await?;
            created += result.rows_affected();
        }
        Ok(created)
    }

    pub(crate) async fn list_occurrences_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        task_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Occurrence>, CoreError> {
        let occurrences = sqlx::query_as(
            r#"SELECT * FROM task_occurrences
            WHERE task_id = $1 AND due_at >= $2 AND due_at <= $3
            ORDER BY due_at
            LIMIT $4"#,
        )
        .bind(task_id)
        .bind(from)
        .bind(to)
        .bind(sql_limit(limit))
        .fetch_all(&mut **tx)
        .await?;
        Ok(occurrences)
    }

    pub(crate) async fn find_occurrence_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        task_id: Uuid,
        occurrence_id: Uuid,
    ) -> Result<Option<Occurrence>, CoreError> {
        let occurrence = sqlx::query_as("SELECT * FROM task_occurrences WHERE id = $1 AND task_id = $2")
            .bind(occurrence_id)
            .bind(task_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(occurrence)
    }

    /// Moves an occurrence to the requested state. `completed_at` is stamped
    /// on the pending to completed edge and cleared on the way back; a row
    /// already in the requested state is left untouched.
    pub(crate) async fn set_completion_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        occurrence: Occurrence,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<Occurrence, CoreError> {
        if occurrence.completed == completed {
            return Ok(occurrence);
        }

        let completed_at = completed.then_some(now);
        sqlx::query(
            "UPDATE task_occurrences SET completed = $1, completed_at = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(completed)
        .bind(completed_at)
        .bind(now)
        .bind(occurrence.id)
        .execute(&mut **tx)
        .await?;

        Ok(Occurrence {
            completed,
            completed_at,
            updated_at: now,
            ..occurrence
        })
    }

    /// Due time of the earliest pending occurrence at or after `at`.
    pub(crate) async fn earliest_pending_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        task_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, CoreError> {
        let due_at = sqlx::query_scalar(
            r#"SELECT due_at FROM task_occurrences
            WHERE task_id = $1 AND completed = 0 AND due_at >= $2
            ORDER BY due_at
            LIMIT 1"#,
        )
        .bind(task_id)
        .bind(at)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(due_at)
    }
}
