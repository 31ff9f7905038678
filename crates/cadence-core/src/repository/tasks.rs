use crate::error::CoreError;
use crate::models::{NewTaskData, Task};
use crate::repository::SqliteRepository;
use crate::rule::RecurrenceRule;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn find_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as("SELECT * FROM tasks WHERE owner_id = $1 ORDER BY created_at, id")
            .bind(owner_id)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_project_tasks(&self, owner_id: Uuid, project_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            "SELECT * FROM tasks WHERE owner_id = $1 AND project_id = $2 ORDER BY created_at, id",
        )
        .bind(owner_id)
        .bind(project_id)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn find_recurring_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            r#"SELECT * FROM tasks
            WHERE owner_id = $1 AND repeat_every IS NOT NULL AND repeat_unit IS NOT NULL
            ORDER BY created_at, id"#,
        )
        .bind(owner_id)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn find_due_tasks(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            r#"SELECT * FROM tasks
            WHERE owner_id = $1
            AND repeat_every IS NULL
            AND due_at IS NOT NULL
            AND due_at >= $2 AND due_at <= $3
            ORDER BY due_at, id"#,
        )
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn delete_task(&self, owner_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("task"));
        }
        Ok(())
    }
}

impl SqliteRepository {
    /// Inserts a validated draft. `next_due_at` starts at the anchor for
    /// recurring tasks and stays null otherwise.
    pub(crate) async fn insert_task_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner_id: Uuid,
        data: NewTaskData,
        rule: Option<RecurrenceRule>,
        now: DateTime<Utc>,
    ) -> Result<Task, CoreError> {
        let task = Task {
            id: Uuid::now_v7(),
            owner_id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            due_at: data.due_at,
            repeat_every: rule.map(|r| i64::from(r.every())),
            repeat_unit: rule.map(|r| r.unit()),
            next_due_at: rule.and(data.due_at),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO tasks (id, owner_id, project_id, title, description, due_at, repeat_every, repeat_unit, next_due_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(task.id)
        .bind(task.owner_id)
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_at)
        .bind(task.repeat_every)
        .bind(task.repeat_unit)
        .bind(task.next_due_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(task)
    }

    pub(crate) async fn find_task_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner_id: Uuid,
        task_id: Uuid,
    ) -> Result<Task, CoreError> {
        sqlx::query_as("SELECT * FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| CoreError::not_found("task"))
    }

    /// Resolves a task that exists, belongs to `owner_id` and carries a rule,
    /// in one statement. Any miss is the same `NotFound`.
    pub(crate) async fn find_recurring_task_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner_id: Uuid,
        task_id: Uuid,
    ) -> Result<Task, CoreError> {
        sqlx::query_as(
            r#"SELECT * FROM tasks
            WHERE id = $1 AND owner_id = $2
            AND repeat_every IS NOT NULL AND repeat_unit IS NOT NULL"#,
        )
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| CoreError::not_found("task"))
    }

    pub(crate) async fn set_next_due_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        task_id: Uuid,
        next_due_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"UPDATE tasks SET next_due_at = $1, updated_at = $2
            WHERE id = $3 AND next_due_at IS NOT $1"#,
        )
        .bind(next_due_at)
        .bind(now)
        .bind(task_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
