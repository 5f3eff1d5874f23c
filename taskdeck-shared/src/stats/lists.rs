/// Ordered list views over a user's tasks
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::cmp::Reverse;

use super::due::{days_until_due, DueLabel};
use crate::models::task::Task;

/// Default number of tasks on the "recent" list
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Pending task on the upcoming list, annotated with its due status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingTask {
    #[serde(flatten)]
    pub task: Task,

    pub days_until_due: i64,

    pub due: DueLabel,
}

/// Pending tasks due on or before `now + horizon_days`, soonest first
///
/// Uses the same window as the dashboard `upcoming` counter, so overdue tasks
/// are listed too. Ties keep input order.
pub fn upcoming_tasks(tasks: &[Task], now: DateTime<Utc>, horizon_days: i64) -> Vec<UpcomingTask> {
    let horizon = now + Duration::days(horizon_days);

    let mut upcoming: Vec<UpcomingTask> = tasks
        .iter()
        .filter(|task| !task.completed && task.due_date <= horizon)
        .map(|task| {
            let days = days_until_due(task, now);
            UpcomingTask {
                task: task.clone(),
                days_until_due: days,
                due: DueLabel::classify(days),
            }
        })
        .collect();

    upcoming.sort_by_key(|entry| entry.task.due_date);
    upcoming
}

/// Most recently created tasks, newest first
pub fn recent_tasks(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut recent = tasks.to_vec();
    recent.sort_by_key(|task| Reverse(task.created_at));
    recent.truncate(limit);
    recent
}

/// Pending tasks ordered by due date, soonest first
pub fn pending_by_due_date(tasks: &[Task]) -> Vec<Task> {
    let mut pending: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
    pending.sort_by_key(|task| task.due_date);
    pending
}

/// Completed tasks ordered by completion time, latest first
///
/// Tasks without `completed_at` sort last.
pub fn completed_by_recency(tasks: &[Task]) -> Vec<Task> {
    let mut done: Vec<Task> = tasks.iter().filter(|t| t.completed).cloned().collect();
    // None < Some, so Reverse puts missing timestamps at the end
    done.sort_by_key(|task| Reverse(task.completed_at));
    done
}
