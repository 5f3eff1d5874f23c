/// Task store boundary
///
/// Every query is scoped to an explicit owner. A task that belongs to someone
/// else is indistinguishable from a task that does not exist.
///
/// Two implementations are provided:
///
/// - [`PgTaskStore`]: PostgreSQL via sqlx, delegating to [`crate::models::task`]
/// - [`MemoryTaskStore`]: in-process map, used by tests and local runs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists a user's tasks matching `filter`, newest first
    async fn list_tasks(&self, user_id: Uuid, filter: TaskFilter) -> Result<Vec<Task>, StoreError>;

    /// Fetches one task owned by `user_id`
    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Creates a pending task
    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// Applies a partial edit and bumps `updated_at`
    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError>;

    /// Completes a pending task
    ///
    /// Returns `None` when the task is missing or already completed.
    async fn complete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_tasks(&self, user_id: Uuid, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_user(&self.pool, user_id, filter).await?)
    }

    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id_and_user(&self.pool, task_id, user_id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let task = Task::create(&self.pool, data).await?;
        tracing::debug!(task_id = %task.id, user_id = %task.user_id, "Task created");
        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update(&self.pool, task_id, user_id, data).await?)
    }

    async fn complete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(Task::mark_completed(&self.pool, user_id, task_id).await?)
    }
}

/// In-memory store
///
/// Last write wins, same as the database store.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing tasks, keeping their ids and timestamps
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let map = tasks.into_iter().map(|task| (task.id, task)).collect();
        Self {
            tasks: RwLock::new(map),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks(&self, user_id: Uuid, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut listed: Vec<Task> = tasks
            .values()
            .filter(|task| task.user_id == user_id && filter.matches(task))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(listed)
    }

    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&task_id).filter(|t| t.user_id == user_id).cloned())
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            due_date: data.due_date,
            due_time: data.due_time,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.get_mut(&task_id).filter(|t| t.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(priority) = data.priority {
            task.priority = priority;
        }
        if let Some(due_date) = data.due_date {
            task.due_date = due_date;
        }
        if let Some(due_time) = data.due_time {
            task.due_time = Some(due_time);
        }
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn complete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks
            .get_mut(&task_id)
            .filter(|t| t.user_id == user_id && !t.completed)
        else {
            return Ok(None);
        };

        let now = Utc::now();
        task.completed = true;
        task.completed_at = Some(now);
        task.updated_at = now;

        Ok(Some(task.clone()))
    }
}
