/// Task aggregation and reporting
///
/// Pure functions that turn one user's already-fetched task list into the
/// derived views the clients render:
///
/// - [`dashboard`]: pending / completed / upcoming counters
/// - [`report`]: totals, overdue count, per-priority counts, completion rate
///   and average completion time
/// - [`calendar`]: per-day dot markers and day buckets
/// - [`due`]: days-until-due and due labels
/// - [`lists`]: ordered list views (upcoming, recent, pending, completed)
///
/// Nothing in this module performs I/O or mutates its input. Every function
/// takes the reference instant `now` (or a time zone) explicitly so results are
/// reproducible. An empty task list always yields zeros and empty collections.
///
/// # Example
///
/// ```
/// use taskdeck_shared::stats::{compute_dashboard_stats, compute_report_stats, DEFAULT_HORIZON_DAYS};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let dashboard = compute_dashboard_stats(&[], now, DEFAULT_HORIZON_DAYS);
/// assert_eq!(dashboard.pending, 0);
///
/// let report = compute_report_stats(&[], now).unwrap();
/// assert_eq!(report.completion_rate, 0);
/// ```

pub mod calendar;
pub mod dashboard;
pub mod due;
pub mod lists;
pub mod report;

pub use calendar::{
    build_calendar_marks, date_key, local_due_date, parse_date_key, tasks_on_date,
    CalendarMarks, DateMarks, Dot, DotColor,
};
pub use dashboard::{compute_dashboard_stats, DashboardStats, DEFAULT_HORIZON_DAYS};
pub use due::{days_until_due, DueLabel};
pub use lists::{
    completed_by_recency, pending_by_due_date, recent_tasks, upcoming_tasks, UpcomingTask,
    DEFAULT_RECENT_LIMIT,
};
pub use report::{compute_report_stats, ReportStats};

use uuid::Uuid;

/// Milliseconds in one day, used for all day-based arithmetic
pub(crate) const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Data-integrity errors detected while aggregating
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// A completed task claims to have been completed before it was created
    #[error("Task {task_id} has completed_at before created_at")]
    NegativeCompletionTime { task_id: Uuid },

    /// A completed task carries no completion timestamp
    #[error("Task {task_id} is completed but has no completed_at")]
    MissingCompletionTime { task_id: Uuid },

    /// A calendar date key is not `YYYY-MM-DD`
    #[error("Invalid date key: {0}")]
    InvalidDateKey(String),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::task::{Priority, Task};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    /// Fixed reference instant: 2025-03-10 12:00:00 UTC
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    /// Pending task due `due_in` from [`now`], created a day earlier
    pub fn pending(priority: Priority, due_in: Duration) -> Task {
        let created = now() - Duration::days(1);
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: "Task".to_string(),
            description: "Description".to_string(),
            priority,
            due_date: now() + due_in,
            due_time: None,
            completed: false,
            completed_at: None,
            created_at: created,
            updated_at: created,
        }
    }

    /// Completed task; `created` and `completed` are offsets from [`now`]
    pub fn completed(
        priority: Priority,
        due_in: Duration,
        created: Duration,
        completed: Duration,
    ) -> Task {
        let mut task = pending(priority, due_in);
        task.created_at = now() + created;
        task.completed = true;
        task.completed_at = Some(now() + completed);
        task.updated_at = now() + completed;
        task
    }
}
