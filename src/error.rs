use chrono::NaiveDate;
use thiserror::Error;

use crate::core::task::TaskId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Task text must not be empty")]
    EmptyText,

    #[error("Task title must not be empty")]
    EmptyTitle,

    #[error("Unknown assignee: {0}")]
    UnknownAssignee(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Parent task not found: {0}")]
    ParentNotFound(TaskId),

    #[error("Task {0} is a subtask and cannot have subtasks of its own")]
    NestedSubtask(TaskId),

    #[error("Task {0} is not a subtask")]
    NotASubtask(TaskId),

    #[error("Invalid date format: {0:?} (expected M/D or MM/DD)")]
    InvalidDateFormat(String),

    #[error("No due date found in the text; state one explicitly (e.g. 11/20)")]
    DateNotFound,

    #[error("Due date {0} is in the past")]
    PastDate(NaiveDate),

    #[error("Unrecognized command format; {0}")]
    CommandFormat(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, Error>;
