/// Calendar markers and day buckets
///
/// Tasks are bucketed by the calendar date of `due_date` in the caller's time
/// zone. Each task contributes one colored dot to its date.
///
/// # Colors
///
/// | Task state          | Color   |
/// |---------------------|---------|
/// | completed           | success |
/// | pending, high       | alert   |
/// | pending, medium     | warning |
/// | pending, low        | success |
use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::StatsError;
use crate::models::task::{Priority, Task};

/// Format of calendar date keys
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Dot color
///
/// Serialized as the hex color the clients draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotColor {
    Alert,
    Warning,
    Success,
}

impl DotColor {
    pub fn hex(&self) -> &'static str {
        match self {
            DotColor::Alert => "#EE316B",
            DotColor::Warning => "#FF9800",
            DotColor::Success => "#4CAF50",
        }
    }

    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::High => DotColor::Alert,
            Priority::Medium => DotColor::Warning,
            Priority::Low => DotColor::Success,
        }
    }

    /// Completed status overrides priority
    pub fn for_task(task: &Task) -> Self {
        if task.completed {
            DotColor::Success
        } else {
            Self::for_priority(task.priority)
        }
    }
}

impl Serialize for DotColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// One task's marker on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dot {
    /// Task the dot stands for
    pub key: Uuid,

    pub color: DotColor,
}

/// All markers on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateMarks {
    pub dots: Vec<Dot>,
    pub marked: bool,
}

/// Date key (`YYYY-MM-DD`) to markers, ordered by date
pub type CalendarMarks = BTreeMap<String, DateMarks>;

/// Formats a calendar date key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date key
pub fn parse_date_key(key: &str) -> Result<NaiveDate, StatsError> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|_| StatsError::InvalidDateKey(key.to_string()))
}

/// Calendar date of a task's due date in `tz`
pub fn local_due_date<Tz: TimeZone>(task: &Task, tz: &Tz) -> NaiveDate {
    let local: DateTime<Tz> = task.due_date.with_timezone(tz);
    local.date_naive()
}

/// Builds per-date dot markers
///
/// Dots within a date keep the input order, so the same input always yields
/// the same output.
pub fn build_calendar_marks<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> CalendarMarks {
    let mut marks = CalendarMarks::new();

    for task in tasks {
        let entry = marks
            .entry(date_key(local_due_date(task, tz)))
            .or_insert_with(|| DateMarks {
                dots: Vec::new(),
                marked: true,
            });

        entry.dots.push(Dot {
            key: task.id,
            color: DotColor::for_task(task),
        });
    }

    marks
}

/// Tasks whose local due date is `date`
pub fn tasks_on_date<'a, Tz: TimeZone>(tasks: &'a [Task], date: NaiveDate, tz: &Tz) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| local_due_date(task, tz) == date)
        .collect()
}
