//! Task domain model.
//!
//! # Responsibility
//! - Define the task record persisted by `TaskRepository`.
//! - Provide filter helpers used by derived task views.
//!
//! # Invariants
//! - `title` is non-blank and unique across all tasks.
//! - `due_date` is a calendar date without time component.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned task identifier.
pub type TaskId = i64;

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// `None` until the task has been saved.
    pub id: Option<TaskId>,
    /// Unique, non-blank title. Used as lookup key for update/delete.
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due_date: NaiveDate,
}

/// Field-level validation failures for [`Task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates an unsaved task.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            completed,
            due_date,
        }
    }

    /// Checks field constraints before any storage access.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }

    /// Returns whether the task still needs work.
    pub fn is_pending(&self) -> bool {
        !self.completed
    }

    /// Returns whether the task is pending and due on `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.is_pending() && self.due_date == date
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskValidationError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn new_task_is_unsaved() {
        let task = Task::new("Homework", "Finish section 4", false, date(2024, 5, 1));
        assert_eq!(task.id, None);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn validate_rejects_whitespace_title() {
        let task = Task::new("  \t", "", false, date(2024, 5, 1));
        assert_eq!(task.validate(), Err(TaskValidationError::BlankTitle));
    }

    #[test]
    fn completed_task_is_never_due() {
        let today = date(2024, 5, 1);
        let mut task = Task::new("Laundry", "", false, today);
        assert!(task.is_due_on(today));
        assert!(!task.is_due_on(date(2024, 5, 2)));

        task.completed = true;
        assert!(!task.is_due_on(today));
    }

    #[test]
    fn serializes_due_date_as_iso_date() {
        let task = Task::new("Homework", "", false, date(2024, 5, 1));
        let json = serde_json::to_value(&task).expect("serialize task");
        assert_eq!(json["due_date"], "2024-05-01");
        assert_eq!(json["completed"], false);
    }
}
