use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Task, TaskKey};

#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    #[error("no task {0}")]
    TaskNotFound(TaskKey),
}

/// The in-memory task store. One instance owns every task for the lifetime
/// of the process; nothing is persisted.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    /// Create a scheduler with an empty collection.
    pub fn new() -> Scheduler {
        Scheduler { tasks: Vec::new() }
    }

    /// Append a task to the collection. Duplicates are allowed; the
    /// collection keeps insertion order.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Every task starting on `date`, in collection order. Sorting for
    /// display is the caller's job. An empty result is not an error.
    pub fn get_tasks_for_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.starts_on(date)).collect()
    }

    /// Remove the first task matching `key` and return it. The collection is
    /// left untouched when no task matches.
    pub fn delete_task(&mut self, key: &TaskKey) -> Result<Task, SchedulerError> {
        match self.position_of(key) {
            Some(index) => Ok(self.tasks.remove(index)),
            None => Err(SchedulerError::TaskNotFound(key.clone())),
        }
    }

    /// Replace the data of the first task matching `key`. Exactly one task
    /// changes; its position in the collection is not guaranteed to survive
    /// later mutations.
    pub fn update_task(&mut self, key: &TaskKey, replacement: Task) -> Result<(), SchedulerError> {
        match self.position_of(key) {
            Some(index) => {
                self.tasks[index] = replacement;
                Ok(())
            }
            None => Err(SchedulerError::TaskNotFound(key.clone())),
        }
    }

    /// Number of tasks over all dates.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position_of(&self, key: &TaskKey) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| task.title == key.title && task.start_time == key.start_time)
    }
}
