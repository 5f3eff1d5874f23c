/// Due-date classification
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::MILLIS_PER_DAY;
use crate::models::task::Task;

/// Whole days until a task is due, rounded up
///
/// `ceil((due_date - now) / 1 day)`: negative means overdue, `0` means due
/// later today (or earlier today), positive means due in that many days.
pub fn days_until_due(task: &Task, now: DateTime<Utc>) -> i64 {
    let millis = (task.due_date - now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}

/// Human-facing bucket for a days-until-due value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum DueLabel {
    Overdue,
    DueToday,
    DueTomorrow,
    DueInDays(i64),
}

impl DueLabel {
    /// Classifies a [`days_until_due`] result
    pub fn classify(days: i64) -> Self {
        match days {
            d if d < 0 => DueLabel::Overdue,
            0 => DueLabel::DueToday,
            1 => DueLabel::DueTomorrow,
            d => DueLabel::DueInDays(d),
        }
    }

    /// Classifies a task relative to `now`
    pub fn for_task(task: &Task, now: DateTime<Utc>) -> Self {
        Self::classify(days_until_due(task, now))
    }
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::Overdue => f.write_str("overdue"),
            DueLabel::DueToday => f.write_str("due today"),
            DueLabel::DueTomorrow => f.write_str("due tomorrow"),
            DueLabel::DueInDays(days) => write!(f, "due in {} days", days),
        }
    }
}
