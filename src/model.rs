use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// A single scheduled item: a time window on one day, a priority and a
/// description. A task is never mutated in place; editing replaces the whole
/// task through the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub estimated_time: f64, // in hours
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub priority: i32,
    pub status: Status,
}

/// The state of a task. Every task is created in progress and nothing
/// transitions it out yet; the field exists for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::InProgress => write!(f, "in progress"),
        }
    }
}

/// The (title, start time) pair the interface uses to name a task it only
/// knows by its displayed values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub title: String,
    pub start_time: NaiveDateTime,
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} starting at {}",
            self.title,
            self.start_time.format("%d.%m.%Y %H:%M")
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("estimated time must be a non-negative number of hours, got {0}")]
    InvalidEstimate(f64),
}

/// Convert an estimate in hours to a duration with seconds precision.
fn estimate_as_duration(estimated_time: f64) -> Duration {
    Duration::seconds((estimated_time * 3600.0).round() as i64)
}

impl Task {
    /// Build a task from its start time and estimated duration. The end time
    /// is derived from the two, so every task that exists has
    /// `end_time >= start_time`.
    pub fn new(
        title: String,
        description: String,
        estimated_time: f64,
        start_time: NaiveDateTime,
        priority: i32,
    ) -> Result<Task, TaskError> {
        if !estimated_time.is_finite() || estimated_time < 0.0 {
            return Err(TaskError::InvalidEstimate(estimated_time));
        }
        Ok(Task {
            title,
            description,
            estimated_time,
            start_time,
            end_time: start_time + estimate_as_duration(estimated_time),
            priority,
            status: Status::InProgress,
        })
    }

    /// Compare two tasks by start time, for display sorting. Tasks starting
    /// at the same time compare equal regardless of their other fields.
    pub fn cmp_by_start(&self, other: &Task) -> Ordering {
        self.start_time.cmp(&other.start_time)
    }

    /// Whether the task starts on the given calendar date.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_time.date() == date
    }

    /// The estimated time as a duration with seconds precision.
    pub fn estimated_duration(&self) -> Duration {
        estimate_as_duration(self.estimated_time)
    }

    pub fn key(&self) -> TaskKey {
        TaskKey {
            title: self.title.clone(),
            start_time: self.start_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn task(title: &str, estimated_time: f64, start_time: NaiveDateTime) -> Task {
        Task::new(title.to_string(), String::new(), estimated_time, start_time, 1).unwrap()
    }

    #[test]
    fn end_time_is_start_plus_estimate() {
        let two_hours = task("Report", 2.0, start(9, 0));
        assert_eq!(two_hours.end_time, start(11, 0));

        let half_hour = task("Standup", 0.5, start(9, 0));
        assert_eq!(half_hour.end_time, start(9, 30));
    }

    #[test]
    fn zero_estimate_gives_an_empty_window() {
        let t = task("Reminder", 0.0, start(9, 0));
        assert_eq!(t.start_time, t.end_time);
    }

    #[test]
    fn bad_estimates_are_rejected() {
        let result = Task::new("T".to_string(), String::new(), -1.0, start(9, 0), 1);
        assert_eq!(result, Err(TaskError::InvalidEstimate(-1.0)));

        let result = Task::new("T".to_string(), String::new(), f64::NAN, start(9, 0), 1);
        assert!(matches!(result, Err(TaskError::InvalidEstimate(_))));
    }

    #[test]
    fn new_tasks_are_in_progress() {
        assert_eq!(task("T", 1.0, start(9, 0)).status, Status::InProgress);
    }

    #[test]
    fn ordering_follows_start_time_only() {
        let early = task("B", 1.0, start(9, 0));
        let late = task("A", 1.0, start(14, 0));
        assert_eq!(early.cmp_by_start(&late), Ordering::Less);
        assert_eq!(late.cmp_by_start(&early), Ordering::Greater);

        // same start, different everything else
        let twin = task("Z", 3.0, start(9, 0));
        assert_eq!(early.cmp_by_start(&twin), Ordering::Equal);
    }

    #[test]
    fn starts_on_matches_the_calendar_date() {
        let t = task("T", 1.0, start(23, 0));
        assert!(t.starts_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!t.starts_on(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
    }

    #[test]
    fn key_carries_title_and_start() {
        let t = task("Report", 2.0, start(9, 0));
        let key = t.key();
        assert_eq!(key.title, "Report");
        assert_eq!(key.start_time, start(9, 0));
    }

    #[test]
    fn estimated_duration_matches_the_estimate() {
        assert_eq!(
            task("T", 1.5, start(9, 0)).estimated_duration(),
            Duration::minutes(90)
        );
    }
}
