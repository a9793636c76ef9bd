//! The external task/user store, expressed as an async trait.
//!
//! Every mutation is a single atomic request with exactly one success or
//! one failure outcome; serializing concurrent writers against the same
//! task identity is the store's job, not the core's. The core never keeps
//! an optimistic local copy: a failed call leaves local state untouched.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::core::user::User;
use crate::error::Result;

/// Fields for a task the store has not seen yet.
///
/// The store assigns `id`, `created_at`, `updated_at` and the initial
/// `TODO` status.
#[derive(Debug, Clone)]
pub struct NewTaskRecord {
    pub title: String,
    pub assignee_email: String,
    pub assignee_name: String,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub created_by: String,
    pub parent_task_id: Option<TaskId>,
}

/// Partial update to an existing task. `None` fields are left untouched;
/// the store stamps `updated_at` on every successful update.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub assignee_email: Option<String>,
    pub assignee_name: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patch that changes the status and nothing else.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// The remote task/user store contract.
///
/// `list_users`, `list_tasks` and `current_user` are idempotent; the
/// mutations are not, and callers must key any derived state by task
/// identity rather than operation order.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// The user this session acts as.
    async fn current_user(&self) -> Result<User>;

    /// All known users. Read-only reference data.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// The full task collection, in insertion order.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Persist a new task. The store assigns identity and timestamps.
    async fn create_task(&self, record: NewTaskRecord) -> Result<Task>;

    /// Apply a partial update and return the updated task.
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task>;

    /// Delete a task and, atomically, every subtask referencing it.
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}
