//! Task data model.
//!
//! Tasks are the single mutable collection in the system. Each task carries
//! a denormalized assignee snapshot, a resolved due date (never a bare
//! month/day), and an optional back-reference to a parent task.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a task.
///
/// Uses UUID v4 for generation and provides a short form display
/// for human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Create a new unique task identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Status of a task in its lifecycle.
///
/// Top-level tasks move `Todo -> Reported -> Done`, with an admin
/// send-back edge `Reported -> Todo`. Subtasks additionally support a
/// direct `Todo <-> Done` checkbox toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started (or sent back by an admin).
    #[default]
    Todo,
    /// Completion reported by the assignee, awaiting admin review.
    Reported,
    /// Approved complete. Terminal for top-level tasks.
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "TODO"),
            TaskStatus::Reported => write!(f, "REPORTED"),
            TaskStatus::Done => write!(f, "DONE"),
        }
    }
}

/// Priority of a task.
///
/// Serialized forms (`High`/`Med`/`Low`) match the store format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskPriority {
    High,
    #[serde(rename = "Med")]
    #[default]
    Medium,
    Low,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::High => write!(f, "High"),
            TaskPriority::Medium => write!(f, "Med"),
            TaskPriority::Low => write!(f, "Low"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "高" => Ok(TaskPriority::High),
            "med" | "medium" | "中" => Ok(TaskPriority::Medium),
            "low" | "低" => Ok(TaskPriority::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A single task.
///
/// `assignee_name` is a snapshot of the assignee's display name taken at
/// creation or edit time; it is not re-synced if the user is later renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: TaskId,
    /// Short human-readable title.
    pub title: String,
    /// Email of the assigned user. Must reference a known user at creation.
    pub assignee_email: String,
    /// Display name of the assignee at assignment time.
    pub assignee_name: String,
    /// Resolved due date. Subtasks copy their parent's due date verbatim.
    pub due_date: NaiveDate,
    /// Task priority.
    pub priority: TaskPriority,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Email of the user who created the task.
    pub created_by: String,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last modified. Never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
    /// Owning task, set for subtasks only. One nesting level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<TaskId>,
}

impl Task {
    /// Check if this task is a subtask.
    pub fn is_subtask(&self) -> bool {
        self.parent_task_id.is_some()
    }

    /// Check if this task is a top-level task.
    pub fn is_top_level(&self) -> bool {
        self.parent_task_id.is_none()
    }

    /// Check if this task has been approved complete.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}
