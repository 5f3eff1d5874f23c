/// Dashboard counters
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::task::Task;

/// Default look-ahead window for "upcoming" tasks, in days
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// Home screen counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Tasks not yet completed
    pub pending: usize,

    /// Completed tasks
    pub completed: usize,

    /// Pending tasks due on or before `now + horizon`
    pub upcoming: usize,
}

/// Computes the dashboard counters
///
/// `upcoming` has no lower bound: a pending task that is already overdue is
/// still counted as upcoming.
pub fn compute_dashboard_stats(
    tasks: &[Task],
    now: DateTime<Utc>,
    horizon_days: i64,
) -> DashboardStats {
    let horizon = now + Duration::days(horizon_days);

    tasks.iter().fold(DashboardStats::default(), |mut stats, task| {
        if task.completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
            if task.due_date <= horizon {
                stats.upcoming += 1;
            }
        }
        stats
    })
}
