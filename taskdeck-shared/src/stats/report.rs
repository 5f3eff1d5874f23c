/// Report statistics
///
/// Totals, per-priority counts, completion rate and average completion time
/// for the reports screen.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{StatsError, MILLIS_PER_DAY};
use crate::models::task::{Priority, Task};

/// Aggregated report over all of a user's tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,

    /// Pending tasks whose due date is strictly before `now`
    pub overdue_tasks: usize,

    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,

    /// Percentage of completed tasks, rounded to the nearest integer (0..=100)
    pub completion_rate: u32,

    /// Mean days between creation and completion, rounded to one decimal
    pub average_completion_time: f64,
}

/// Computes report statistics
///
/// # Errors
///
/// Returns [`StatsError::NegativeCompletionTime`] for a completed task whose
/// `completed_at` precedes `created_at`, and
/// [`StatsError::MissingCompletionTime`] for a completed task without
/// `completed_at`. Such records are never folded into the average.
pub fn compute_report_stats(tasks: &[Task], now: DateTime<Utc>) -> Result<ReportStats, StatsError> {
    let mut stats = ReportStats {
        total_tasks: tasks.len(),
        ..Default::default()
    };
    let mut total_completion_days = 0.0_f64;

    for task in tasks {
        match task.priority {
            Priority::High => stats.high_priority += 1,
            Priority::Medium => stats.medium_priority += 1,
            Priority::Low => stats.low_priority += 1,
        }

        if task.completed {
            stats.completed_tasks += 1;
            total_completion_days += completion_days(task)?;
        } else {
            stats.pending_tasks += 1;
            if task.is_overdue(now) {
                stats.overdue_tasks += 1;
            }
        }
    }

    if stats.total_tasks > 0 {
        let rate = stats.completed_tasks as f64 / stats.total_tasks as f64 * 100.0;
        stats.completion_rate = rate.round() as u32;
    }

    if stats.completed_tasks > 0 {
        let average = total_completion_days / stats.completed_tasks as f64;
        stats.average_completion_time = round_to_tenth(average);
    }

    Ok(stats)
}

fn completion_days(task: &Task) -> Result<f64, StatsError> {
    let completed_at = task
        .completed_at
        .ok_or(StatsError::MissingCompletionTime { task_id: task.id })?;

    let elapsed = completed_at - task.created_at;
    if elapsed < chrono::Duration::zero() {
        return Err(StatsError::NegativeCompletionTime { task_id: task.id });
    }

    Ok(elapsed.num_milliseconds() as f64 / MILLIS_PER_DAY)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
