//! Task operations: creation pipelines, status changes, edits, deletion.
//!
//! `TaskService` glues the pure subsystems (command parsing, date
//! resolution, transition rules, views) to the external store and
//! extractor. Validation always completes before the store is touched, so
//! a rejected operation leaves no trace, and a failed remote call leaves
//! local state exactly as it was.

use chrono::{Local, NaiveDate};

use crate::command::parse_command;
use crate::core::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::core::user::User;
use crate::dates::resolve_month_day;
use crate::error::{Error, Result};
use crate::extract::TaskExtractor;
use crate::klog_debug;
use crate::store::{NewTaskRecord, TaskPatch, TaskStore};
use crate::transitions;

/// A task-creation request.
///
/// The two variants run different pipelines: top-level creation extracts a
/// title and due date from free text, while subtask creation skips
/// extraction entirely and copies the parent's due date verbatim.
#[derive(Debug, Clone)]
pub enum NewTaskInput {
    TopLevel {
        text: String,
        assignee_email: String,
        priority: TaskPriority,
    },
    Subtask {
        text: String,
        parent_id: TaskId,
        /// Defaults to the parent's assignee.
        assignee_email: Option<String>,
        /// Defaults to the parent's priority.
        priority: Option<TaskPriority>,
    },
}

/// Partial edit of an existing task. Admin only.
///
/// Unlike creation, an edit may set a past due date (the past-date guard
/// applies at creation time only).
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub assignee_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

pub struct TaskService<S, X> {
    store: S,
    extractor: X,
}

impl<S: TaskStore, X: TaskExtractor> TaskService<S, X> {
    pub fn new(store: S, extractor: X) -> Self {
        Self { store, extractor }
    }

    /// Access the underlying store, e.g. for read-only listing.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Create a task, dispatching on the input variant.
    pub async fn create_task(&self, input: NewTaskInput) -> Result<Task> {
        match input {
            NewTaskInput::TopLevel {
                text,
                assignee_email,
                priority,
            } => self.create_top_level(&text, &assignee_email, priority).await,
            NewTaskInput::Subtask {
                text,
                parent_id,
                assignee_email,
                priority,
            } => {
                self.create_subtask(&text, parent_id, assignee_email, priority)
                    .await
            }
        }
    }

    /// Create a top-level task from a structured command string.
    ///
    /// The parsed assignee token is resolved against the known users by
    /// display name or email, with one leading `@` tolerated.
    pub async fn create_from_command(&self, text: &str) -> Result<Task> {
        let command = parse_command(text)?;
        let token = command
            .assignee_name
            .strip_prefix('@')
            .unwrap_or(&command.assignee_name);
        let users = self.store.list_users().await?;
        let assignee = users
            .iter()
            .find(|u| u.display_name == token || u.email == token)
            .cloned()
            .ok_or_else(|| Error::UnknownAssignee(command.assignee_name.clone()))?;

        let today = Self::today();
        let due = resolve_month_day(&command.due_date, today)?;
        if due < today {
            return Err(Error::PastDate(due));
        }

        klog_debug!(
            "create_from_command: assignee={} title={:?} due={}",
            assignee.email,
            command.title,
            due
        );
        self.persist_new(
            &command.title,
            &assignee,
            due,
            command.priority,
            None,
        )
        .await
    }

    async fn create_top_level(
        &self,
        text: &str,
        assignee_email: &str,
        priority: TaskPriority,
    ) -> Result<Task> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        let assignee = self.require_user(assignee_email).await?;

        // Extractor output is untrusted; validate it like user input.
        let extraction = self.extractor.extract(text).await?;
        let title = extraction.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        let raw_due = extraction.due_date.ok_or(Error::DateNotFound)?;

        let today = Self::today();
        let due = resolve_month_day(&raw_due, today)?;
        if due < today {
            return Err(Error::PastDate(due));
        }

        klog_debug!(
            "create_top_level: assignee={} title={:?} due={}",
            assignee.email,
            title,
            due
        );
        self.persist_new(&title, &assignee, due, priority, None).await
    }

    async fn create_subtask(
        &self,
        text: &str,
        parent_id: TaskId,
        assignee_email: Option<String>,
        priority: Option<TaskPriority>,
    ) -> Result<Task> {
        let title = text.trim();
        if title.is_empty() {
            return Err(Error::EmptyText);
        }

        let parent = self
            .find_task(parent_id)
            .await?
            .ok_or(Error::ParentNotFound(parent_id))?;
        if parent.is_subtask() {
            return Err(Error::NestedSubtask(parent_id));
        }

        let email = assignee_email.unwrap_or_else(|| parent.assignee_email.clone());
        let assignee = self.require_user(&email).await?;
        let priority = priority.unwrap_or(parent.priority);

        klog_debug!(
            "create_subtask: parent={} assignee={} title={:?}",
            parent_id.short(),
            assignee.email,
            title
        );
        // The parent's due date is copied verbatim; no resolution runs, and
        // date text inside the subtask title stays in the title.
        self.persist_new(title, &assignee, parent.due_date, priority, Some(parent_id))
            .await
    }

    async fn persist_new(
        &self,
        title: &str,
        assignee: &User,
        due_date: NaiveDate,
        priority: TaskPriority,
        parent_task_id: Option<TaskId>,
    ) -> Result<Task> {
        let creator = self.store.current_user().await?;
        self.store
            .create_task(NewTaskRecord {
                title: title.to_string(),
                assignee_email: assignee.email.clone(),
                assignee_name: assignee.display_name.clone(),
                due_date,
                priority,
                created_by: creator.email,
                parent_task_id,
            })
            .await
    }

    /// Assignee reports the task complete.
    pub async fn report(&self, id: TaskId, actor: &User) -> Result<Task> {
        self.change_status(id, TaskStatus::Reported, actor).await
    }

    /// Admin approves a reported task.
    pub async fn approve(&self, id: TaskId, actor: &User) -> Result<Task> {
        self.change_status(id, TaskStatus::Done, actor).await
    }

    /// Admin sends a reported task back to TODO.
    pub async fn send_back(&self, id: TaskId, actor: &User) -> Result<Task> {
        self.change_status(id, TaskStatus::Todo, actor).await
    }

    /// Move a task along the transition graph as `actor`.
    ///
    /// A transition changes `status` and `updated_at` only.
    pub async fn change_status(
        &self,
        id: TaskId,
        to: TaskStatus,
        actor: &User,
    ) -> Result<Task> {
        let task = self
            .find_task(id)
            .await?
            .ok_or(Error::TaskNotFound(id))?;
        transitions::authorize(actor, &task, to)?;

        klog_debug!(
            "change_status: task={} {} -> {} by {}",
            id.short(),
            task.status,
            to,
            actor.email
        );
        self.store.update_task(id, TaskPatch::status(to)).await
    }

    /// Flip a subtask between TODO and DONE, bypassing REPORTED.
    ///
    /// Open to anyone who can view the subtask.
    pub async fn toggle_subtask(&self, id: TaskId, actor: &User) -> Result<Task> {
        let tasks = self.store.list_tasks().await?;
        let task = tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        let parent_id = task.parent_task_id.ok_or(Error::NotASubtask(id))?;
        let parent = tasks.iter().find(|t| t.id == parent_id);

        if !transitions::can_view(actor, task, parent) {
            return Err(Error::Forbidden(
                "no access to this subtask".to_string(),
            ));
        }

        let to = transitions::toggle_target(task.status);
        klog_debug!("toggle_subtask: task={} -> {}", id.short(), to);
        self.store.update_task(id, TaskPatch::status(to)).await
    }

    /// Edit task fields. Admin only.
    ///
    /// Changing the assignee re-snapshots `assignee_name`. Editing a
    /// parent's due date does not re-sync its subtasks.
    pub async fn edit_task(&self, id: TaskId, edit: TaskEdit, actor: &User) -> Result<Task> {
        if !actor.is_admin() {
            return Err(Error::Forbidden("only an admin can edit tasks".to_string()));
        }
        self.find_task(id).await?.ok_or(Error::TaskNotFound(id))?;

        let mut patch = TaskPatch {
            due_date: edit.due_date,
            priority: edit.priority,
            ..TaskPatch::default()
        };

        if let Some(title) = edit.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(Error::EmptyTitle);
            }
            patch.title = Some(title);
        }

        if let Some(email) = edit.assignee_email {
            let assignee = self.require_user(&email).await?;
            patch.assignee_email = Some(assignee.email);
            patch.assignee_name = Some(assignee.display_name);
        }

        klog_debug!("edit_task: task={} by {}", id.short(), actor.email);
        self.store.update_task(id, patch).await
    }

    /// Delete a task and all of its subtasks. Admin only.
    pub async fn delete_task(&self, id: TaskId, actor: &User) -> Result<()> {
        if !actor.is_admin() {
            return Err(Error::Forbidden(
                "only an admin can delete tasks".to_string(),
            ));
        }
        klog_debug!("delete_task: task={} by {}", id.short(), actor.email);
        self.store.delete_task(id).await
    }

    async fn require_user(&self, email: &str) -> Result<User> {
        self.store
            .list_users()
            .await?
            .into_iter()
            .find(|u| u.email == email)
            .ok_or_else(|| Error::UnknownAssignee(email.to_string()))
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self
            .store
            .list_tasks()
            .await?
            .into_iter()
            .find(|t| t.id == id))
    }
}
