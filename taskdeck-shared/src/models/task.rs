/// Task model and database operations
///
/// This module provides the Task model: a user-owned to-do item with a due date,
/// a priority, and a one-way completion flag.
///
/// # Lifecycle
///
/// ```text
/// pending ──(edit)──> pending
/// pending ──(complete)──> completed
/// ```
///
/// Completion is one-way. `completed_at` is set exactly when a task moves from
/// pending to completed and never otherwise.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('high', 'medium', 'low');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(50) NOT NULL,
///     description TEXT NOT NULL,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ NOT NULL,
///     due_time TIMESTAMPTZ,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tasks_completion_consistent
///         CHECK (completed = (completed_at IS NOT NULL))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Priority, Task};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     user_id: Uuid::new_v4(),
///     title: "Pay rent".to_string(),
///     description: "Transfer before the 5th".to_string(),
///     priority: Priority::High,
///     due_date: Utc::now() + Duration::days(3),
///     due_time: None,
/// }).await?;
///
/// Task::mark_completed(&pool, task.user_id, task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Converts priority to its storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parses a free-form priority label
    ///
    /// Only `"high"` and `"medium"` are recognised; every other value
    /// (including an empty string) is treated as [`Priority::Low`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task model representing a user's to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owner of the task (immutable)
    pub user_id: Uuid,

    /// Short title, trimmed, at most 50 characters
    pub title: String,

    /// Free-text description, trimmed
    pub description: String,

    /// Task priority
    pub priority: Priority,

    /// Due date
    pub due_date: DateTime<Utc>,

    /// Optional due time; when absent the time of `due_date` applies
    pub due_time: Option<DateTime<Utc>>,

    /// Whether the task is completed
    pub completed: bool,

    /// When the task was completed (set iff `completed`)
    pub completed_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Time of day the task is due
    ///
    /// Falls back to the time component of `due_date` when no explicit
    /// `due_time` was recorded.
    pub fn effective_due_time(&self) -> NaiveTime {
        self.due_time.unwrap_or(self.due_date).time()
    }

    /// Whether the task is pending and its due date is strictly before `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date < now
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owner
    pub user_id: Uuid,

    /// Title (already trimmed and validated)
    pub title: String,

    /// Description (already trimmed and validated)
    pub description: String,

    /// Priority (defaults to medium)
    #[serde(default)]
    pub priority: Priority,

    /// Due date
    pub due_date: DateTime<Utc>,

    /// Optional due time
    pub due_time: Option<DateTime<Utc>>,
}

/// Input for editing a task
///
/// Every field is optional; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub due_time: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// Returns true if no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.due_time.is_none()
    }
}

/// Filter applied when listing a user's tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Restrict to completed (`Some(true)`) or pending (`Some(false)`) tasks
    pub completed: Option<bool>,
}

impl TaskFilter {
    /// Filter matching every task
    pub fn all() -> Self {
        Self { completed: None }
    }

    /// Filter matching pending tasks only
    pub fn pending() -> Self {
        Self {
            completed: Some(false),
        }
    }

    /// Filter matching completed tasks only
    pub fn completed() -> Self {
        Self {
            completed: Some(true),
        }
    }

    /// Checks whether a task passes the filter
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.map_or(true, |c| task.completed == c)
    }
}

const TASK_COLUMNS: &str = "id, user_id, title, description, priority, due_date, due_time, \
                            completed, completed_at, created_at, updated_at";

impl Task {
    /// Creates a new pending task
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails (including CHECK
    /// violations for blank titles or descriptions)
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, due_date, due_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.user_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(data.due_date)
            .bind(data.due_time)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Tasks owned by other users are reported as missing.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists a user's tasks, newest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR completed = $2)
            ORDER BY created_at DESC
            "#
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(filter.completed)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Applies a partial edit
    ///
    /// Returns `None` if the task does not exist for this user.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                due_date = COALESCE($6, due_date),
                due_time = COALESCE($7, due_time),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(data.due_date)
            .bind(data.due_time)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Marks a pending task as completed
    ///
    /// Sets `completed_at` and `updated_at`. Returns `None` if the task does
    /// not exist for this user or is already completed.
    pub async fn mark_completed(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET completed = TRUE,
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND completed = FALSE
            RETURNING {TASK_COLUMNS}
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }
}
