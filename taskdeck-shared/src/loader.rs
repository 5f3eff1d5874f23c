/// Fetch-then-aggregate orchestration
///
/// Each function fetches one user's tasks through a [`TaskStore`], waits for
/// the complete list, then hands it to the pure functions in
/// [`crate::stats`]. The owner is always passed in explicitly.
///
/// A failed fetch is returned once; nothing here retries.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::task::{Task, TaskFilter};
use crate::stats::{
    self, CalendarMarks, DashboardStats, ReportStats, StatsError, UpcomingTask,
};
use crate::store::{StoreError, TaskStore};

/// Loader errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Dashboard counters for a user
pub async fn load_dashboard(
    store: &dyn TaskStore,
    user_id: Uuid,
    now: DateTime<Utc>,
    horizon_days: i64,
) -> Result<DashboardStats, LoadError> {
    let tasks = store.list_tasks(user_id, TaskFilter::all()).await?;
    Ok(stats::compute_dashboard_stats(&tasks, now, horizon_days))
}

/// Report statistics for a user
///
/// # Errors
///
/// Returns [`LoadError::Stats`] if any stored task has an inconsistent
/// completion time.
pub async fn load_report(
    store: &dyn TaskStore,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<ReportStats, LoadError> {
    let tasks = store.list_tasks(user_id, TaskFilter::all()).await?;

    stats::compute_report_stats(&tasks, now).map_err(|e| {
        tracing::warn!(user_id = %user_id, error = %e, "Inconsistent task data in report");
        LoadError::Stats(e)
    })
}

/// Calendar dots for a user in `tz`
pub async fn load_calendar<Tz: TimeZone>(
    store: &dyn TaskStore,
    user_id: Uuid,
    tz: &Tz,
) -> Result<CalendarMarks, LoadError> {
    let tasks = store.list_tasks(user_id, TaskFilter::all()).await?;
    Ok(stats::build_calendar_marks(&tasks, tz))
}

/// Tasks due on one local date, in store order
pub async fn load_day<Tz: TimeZone>(
    store: &dyn TaskStore,
    user_id: Uuid,
    date: NaiveDate,
    tz: &Tz,
) -> Result<Vec<Task>, LoadError> {
    let tasks = store.list_tasks(user_id, TaskFilter::all()).await?;
    Ok(stats::tasks_on_date(&tasks, date, tz)
        .into_iter()
        .cloned()
        .collect())
}

/// Pending tasks inside the horizon, soonest first
pub async fn load_upcoming(
    store: &dyn TaskStore,
    user_id: Uuid,
    now: DateTime<Utc>,
    horizon_days: i64,
) -> Result<Vec<UpcomingTask>, LoadError> {
    let tasks = store.list_tasks(user_id, TaskFilter::pending()).await?;
    Ok(stats::upcoming_tasks(&tasks, now, horizon_days))
}

/// Newest tasks
pub async fn load_recent(
    store: &dyn TaskStore,
    user_id: Uuid,
    limit: usize,
) -> Result<Vec<Task>, LoadError> {
    let tasks = store.list_tasks(user_id, TaskFilter::all()).await?;
    Ok(stats::recent_tasks(&tasks, limit))
}

/// Task list in the order each screen shows it
///
/// Pending tasks are ordered by due date, completed tasks by completion time
/// (latest first), and the unfiltered list newest first.
pub async fn load_task_list(
    store: &dyn TaskStore,
    user_id: Uuid,
    filter: TaskFilter,
) -> Result<Vec<Task>, LoadError> {
    let tasks = store.list_tasks(user_id, filter).await?;

    let ordered = match filter.completed {
        Some(false) => stats::pending_by_due_date(&tasks),
        Some(true) => stats::completed_by_recency(&tasks),
        None => tasks,
    };

    Ok(ordered)
}
