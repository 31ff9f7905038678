//! Recurrence service: the orchestration layer over rule validation,
//! generation and the occurrence store.
//!
//! Every operation that touches a task's occurrences runs as one unit of
//! work: it holds the task's in-process lock, opens a single transaction and
//! is re-run from scratch by [`with_retry`] when SQLite reports contention.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Sqlite, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::db::with_retry;
use crate::error::CoreError;
use crate::generator::OccurrenceGenerator;
use crate::locks::TaskLocks;
use crate::models::{
    AgendaItem, AgendaKind, MaterializationConfig, NewTaskData, Occurrence, OccurrenceWindow, Task,
};
use crate::repository::{OccurrenceRepository, SqliteRepository, TaskRepository};
use crate::rule::RecurrenceRule;

pub struct RecurrenceService<C: Clock = SystemClock> {
    repo: SqliteRepository,
    clock: C,
    config: MaterializationConfig,
    locks: TaskLocks,
}

impl RecurrenceService<SystemClock> {
    pub fn with_system_clock(repo: SqliteRepository, config: MaterializationConfig) -> Self {
        Self::new(repo, SystemClock, config)
    }
}

impl<C: Clock> RecurrenceService<C> {
    pub fn new(repo: SqliteRepository, clock: C, config: MaterializationConfig) -> Self {
        Self {
            repo,
            clock,
            config,
            locks: TaskLocks::new(),
        }
    }

    pub fn repository(&self) -> &SqliteRepository {
        &self.repo
    }

    pub fn config(&self) -> &MaterializationConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Creates a plain or recurring task for `owner_id`.
    ///
    /// Recurring drafts are validated first, then the anchor occurrence and
    /// the upcoming horizon are materialized and `next_due_at` is derived
    /// from the store in the same transaction.
    #[instrument(skip(self, data), fields(project_id = %data.project_id))]
    pub async fn create_task(&self, owner_id: Uuid, data: NewTaskData) -> Result<Task, CoreError> {
        if data.title.trim().is_empty() {
            return Err(CoreError::validation("title is required"));
        }
        let rule = RecurrenceRule::from_fields(data.repeat_every, data.repeat_unit.as_deref(), data.due_at)?;

        let task = with_retry(&self.config.retry, || self.create_task_once(owner_id, &data, rule)).await?;
        tracing::info!(task_id = %task.id, recurring = task.is_recurring(), "task created");
        Ok(task)
    }

    async fn create_task_once(
        &self,
        owner_id: Uuid,
        data: &NewTaskData,
        rule: Option<RecurrenceRule>,
    ) -> Result<Task, CoreError> {
        let now = self.clock.now();
        let mut tx = self.repo.pool().begin().await?;
        let mut task =
            SqliteRepository::insert_task_in_transaction(&mut tx, owner_id, data.clone(), rule, now).await?;

        if let (Some(rule), Some(anchor)) = (rule, task.due_at) {
            SqliteRepository::materialize_in_transaction(&mut tx, task.id, &[anchor], now).await?;
            let generator = OccurrenceGenerator::new(anchor, rule);
            task.next_due_at = self.refresh_next_due(&mut tx, task.id, &generator, now).await?;
        }

        tx.commit().await?;
        Ok(task)
    }

    /// Occurrences of a recurring task inside the resolved window, ascending.
    ///
    /// A missing `from` is now and a missing `to` is the end of the horizon;
    /// the resolved window must not be empty. Unknown, foreign and
    /// non-recurring tasks are all `NotFound`.
    #[instrument(skip(self))]
    pub async fn list_occurrences(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        window: OccurrenceWindow,
    ) -> Result<Vec<Occurrence>, CoreError> {
        let now = self.clock.now();
        let from = window.from.unwrap_or(now);
        let to = window.to.unwrap_or_else(|| self.horizon_end(now));
        if to <= from {
            return Err(CoreError::validation("'to' must be after 'from'"));
        }

        let _guard = self.locks.lock(task_id).await;
        with_retry(&self.config.retry, || self.list_occurrences_once(owner_id, task_id, from, to)).await
    }

    async fn list_occurrences_once(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Occurrence>, CoreError> {
        let now = self.clock.now();
        let mut tx = self.repo.pool().begin().await?;
        let task = SqliteRepository::find_recurring_task_in_transaction(&mut tx, owner_id, task_id).await?;
        let generator = Self::generator_for(&task)?;
        let limit = self.config.max_occurrences_per_request;

        let candidates = generator.between(from, to, limit);
        let created = SqliteRepository::materialize_in_transaction(&mut tx, task.id, &candidates, now).await?;
        tracing::debug!(%from, %to, candidates = candidates.len(), created, "window materialized");

        self.refresh_next_due(&mut tx, task.id, &generator, now).await?;
        let occurrences =
            SqliteRepository::list_occurrences_in_transaction(&mut tx, task.id, from, to, limit).await?;

        tx.commit().await?;
        Ok(occurrences)
    }

    /// Sets the completion state of one occurrence and re-derives the task's
    /// `next_due_at` from the store before returning the updated row.
    #[instrument(skip(self))]
    pub async fn complete_occurrence(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        occurrence_id: Uuid,
        completed: bool,
    ) -> Result<Occurrence, CoreError> {
        let _guard = self.locks.lock(task_id).await;
        let occurrence = with_retry(&self.config.retry, || {
            self.complete_occurrence_once(owner_id, task_id, occurrence_id, completed)
        })
        .await?;

        tracing::info!(%task_id, %occurrence_id, completed, "occurrence updated");
        Ok(occurrence)
    }

    async fn complete_occurrence_once(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        occurrence_id: Uuid,
        completed: bool,
    ) -> Result<Occurrence, CoreError> {
        let now = self.clock.now();
        let mut tx = self.repo.pool().begin().await?;
        let task = SqliteRepository::find_recurring_task_in_transaction(&mut tx, owner_id, task_id).await?;
        let generator = Self::generator_for(&task)?;

        let occurrence = SqliteRepository::find_occurrence_in_transaction(&mut tx, task.id, occurrence_id)
            .await?
            .ok_or_else(|| CoreError::not_found("occurrence"))?;
        let updated = SqliteRepository::set_completion_in_transaction(&mut tx, occurrence, completed, now).await?;

        let next_due_at = self.refresh_next_due(&mut tx, task.id, &generator, now).await?;
        tracing::debug!(%task_id, ?next_due_at, "next due recomputed");

        tx.commit().await?;
        Ok(updated)
    }

    /// Returns the task, refreshing `next_due_at` first when it recurs.
    pub async fn get_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, CoreError> {
        let _guard = self.locks.lock(task_id).await;
        with_retry(&self.config.retry, || self.get_task_once(owner_id, task_id)).await
    }

    async fn get_task_once(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, CoreError> {
        let now = self.clock.now();
        let mut tx = self.repo.pool().begin().await?;
        let task = SqliteRepository::find_task_in_transaction(&mut tx, owner_id, task_id).await?;
        if !task.is_recurring() {
            tx.commit().await?;
            return Ok(task);
        }

        let generator = Self::generator_for(&task)?;
        self.refresh_next_due(&mut tx, task.id, &generator, now).await?;
        let task = SqliteRepository::find_task_in_transaction(&mut tx, owner_id, task_id).await?;
        tx.commit().await?;
        Ok(task)
    }

    /// Tasks of one project, oldest first, recurring ones refreshed.
    pub async fn list_project_tasks(&self, owner_id: Uuid, project_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let tasks = with_retry(&self.config.retry, || self.repo.find_project_tasks(owner_id, project_id)).await?;
        self.refresh_all(owner_id, tasks).await
    }

    /// Every task of the owner, oldest first, recurring ones refreshed.
    pub async fn list_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let tasks = with_retry(&self.config.retry, || self.repo.find_tasks(owner_id)).await?;
        self.refresh_all(owner_id, tasks).await
    }

    async fn refresh_all(&self, owner_id: Uuid, tasks: Vec<Task>) -> Result<Vec<Task>, CoreError> {
        let mut refreshed = Vec::with_capacity(tasks.len());
        for task in tasks {
            if !task.is_recurring() {
                refreshed.push(task);
                continue;
            }
            match self.get_task(owner_id, task.id).await {
                Ok(task) => refreshed.push(task),
                // deleted since the listing was read
                Err(CoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(refreshed)
    }

    /// Deletes a task; its occurrences go with it.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<(), CoreError> {
        let _guard = self.locks.lock(task_id).await;
        with_retry(&self.config.retry, || self.repo.delete_task(owner_id, task_id)).await?;
        tracing::info!(%task_id, "task deleted");
        Ok(())
    }

    /// Plain tasks due in the window merged with the pending occurrences of
    /// the owner's recurring tasks, ordered by due time.
    #[instrument(skip(self))]
    pub async fn agenda(&self, owner_id: Uuid, window: OccurrenceWindow) -> Result<Vec<AgendaItem>, CoreError> {
        let now = self.clock.now();
        let from = window
            .from
            .unwrap_or_else(|| now.checked_sub_signed(Duration::days(1)).unwrap_or(now));
        let to = window
            .to
            .unwrap_or_else(|| now.checked_add_signed(Duration::days(7)).unwrap_or(now));

        if to <= from {
            return Err(CoreError::validation("'to' must be after 'from'"));
        }
        if to - from > self.config.agenda_max_window() {
            return Err(CoreError::validation(format!(
                "agenda window may not exceed {} days",
                self.config.agenda_max_window_days
            )));
        }

        let recurring = with_retry(&self.config.retry, || self.repo.find_recurring_tasks(owner_id)).await?;
        for task in &recurring {
            let _guard = self.locks.lock(task.id).await;
            with_retry(&self.config.retry, || self.materialize_window_once(task, from, to)).await?;
        }

        let plain = with_retry(&self.config.retry, || self.repo.find_due_tasks(owner_id, from, to)).await?;
        let pending =
            with_retry(&self.config.retry, || self.repo.find_pending_agenda_items(owner_id, from, to)).await?;

        let mut items: Vec<AgendaItem> = plain
            .into_iter()
            .filter_map(|task| {
                Some(AgendaItem {
                    kind: AgendaKind::Task,
                    task_id: task.id,
                    occurrence_id: None,
                    project_id: task.project_id,
                    title: task.title,
                    due_at: task.due_at?,
                })
            })
            .chain(pending)
            .collect();
        items.sort_by(|a, b| (a.due_at, a.task_id, a.kind).cmp(&(b.due_at, b.task_id, b.kind)));

        tracing::debug!(%from, %to, items = items.len(), "agenda assembled");
        Ok(items)
    }

    async fn materialize_window_once(
        &self,
        task: &Task,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let Ok(generator) = Self::generator_for(task) else {
            return Ok(());
        };
        let now = self.clock.now();
        let candidates = generator.between(from, to, self.config.max_occurrences_per_request);
        if candidates.is_empty() {
            return Ok(());
        }

        let mut tx = self.repo.pool().begin().await?;
        SqliteRepository::materialize_in_transaction(&mut tx, task.id, &candidates, now).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Brings the upcoming occurrences of a task into the store and writes
    /// `next_due_at` as the earliest pending one at or after `now`.
    ///
    /// Materializes `[now, max(now + horizon, first occurrence >= now)]`. If
    /// everything upcoming is already completed, later occurrences are added
    /// one at a time until a pending one exists or the per-request cap is hit.
    async fn refresh_next_due(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        task_id: Uuid,
        generator: &OccurrenceGenerator,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, CoreError> {
        let limit = self.config.max_occurrences_per_request;
        let horizon_end = self.horizon_end(now);
        let end = match generator.first_at_or_after(now) {
            Some(first) => first.max(horizon_end),
            None => horizon_end,
        };

        let candidates = generator.between(now, end, limit);
        SqliteRepository::materialize_in_transaction(tx, task_id, &candidates, now).await?;

        let mut next_due_at = SqliteRepository::earliest_pending_in_transaction(tx, task_id, now).await?;
        if next_due_at.is_none() {
            let mut cursor = candidates.last().copied().unwrap_or(now);
            for _ in 0..limit {
                let Some(candidate) = generator.first_after(cursor) else {
                    break;
                };
                if SqliteRepository::materialize_in_transaction(tx, task_id, &[candidate], now).await? > 0 {
                    next_due_at = Some(candidate);
                    break;
                }
                cursor = candidate;
            }
        }

        SqliteRepository::set_next_due_in_transaction(tx, task_id, next_due_at, now).await?;
        Ok(next_due_at)
    }

    fn horizon_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.config.horizon())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn generator_for(task: &Task) -> Result<OccurrenceGenerator, CoreError> {
        match (task.rule(), task.due_at) {
            (Some(rule), Some(anchor)) => Ok(OccurrenceGenerator::new(anchor, rule)),
            _ => Err(CoreError::not_found("task")),
        }
    }
}
