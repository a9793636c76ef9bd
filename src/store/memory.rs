//! In-memory task store.
//!
//! Reference implementation of [`TaskStore`]: insertion-ordered task list
//! behind a single async mutex, server-side stamping of identity and
//! timestamps, cascading delete. Used directly in tests and as the engine
//! under [`super::JsonStore`].

use chrono::Utc;
use tokio::sync::Mutex;

use async_trait::async_trait;

use crate::core::task::{Task, TaskId, TaskStatus};
use crate::core::user::User;
use crate::error::{Error, Result};

use super::{NewTaskRecord, TaskPatch, TaskStore};

pub struct MemoryStore {
    users: Vec<User>,
    current_user: String,
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    /// Create a store over a fixed user set, acting as `current_email`.
    pub fn new(users: Vec<User>, current_email: &str) -> Self {
        Self {
            users,
            current_user: current_email.to_string(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with tasks (insertion order preserved).
    pub fn with_tasks(users: Vec<User>, current_email: &str, tasks: Vec<Task>) -> Self {
        Self {
            users,
            current_user: current_email.to_string(),
            tasks: Mutex::new(tasks),
        }
    }

    pub(super) fn build_task(record: NewTaskRecord) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::new(),
            title: record.title,
            assignee_email: record.assignee_email,
            assignee_name: record.assignee_name,
            due_date: record.due_date,
            priority: record.priority,
            status: TaskStatus::Todo,
            created_by: record.created_by,
            created_at: now,
            updated_at: now,
            parent_task_id: record.parent_task_id,
        }
    }

    pub(super) fn apply_patch(task: &mut Task, patch: TaskPatch) {
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(email) = patch.assignee_email {
            task.assignee_email = email;
        }
        if let Some(name) = patch.assignee_name {
            task.assignee_name = name;
        }
        if let Some(due) = patch.due_date {
            task.due_date = due;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        task.updated_at = Utc::now();
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn current_user(&self) -> Result<User> {
        self.users
            .iter()
            .find(|u| u.email == self.current_user)
            .cloned()
            .ok_or_else(|| Error::UnknownUser(self.current_user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.lock().await.clone())
    }

    async fn create_task(&self, record: NewTaskRecord) -> Result<Task> {
        let task = Self::build_task(record);
        self.tasks.lock().await.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        Self::apply_patch(task, patch);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        if !tasks.iter().any(|t| t.id == id) {
            return Err(Error::TaskNotFound(id));
        }
        tasks.retain(|t| t.id != id && t.parent_task_id != Some(id));
        Ok(())
    }
}
