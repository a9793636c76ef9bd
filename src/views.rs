//! Pure view derivations over the task collection.
//!
//! Views are recomputed from the authoritative task list on every read;
//! nothing here caches or mutates. Primary list views carry top-level
//! tasks only — subtasks surface exclusively through [`subtasks_of`] and
//! [`subtask_progress`].

use chrono::NaiveDate;

use crate::core::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::dates::is_overdue;

/// Composable filter over the admin list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Keep only tasks assigned to this email (exact match).
    pub assignee: Option<String>,
    /// Keep only tasks at this priority (exact match).
    pub priority: Option<TaskPriority>,
    /// Keep only incomplete tasks whose due date has slipped.
    pub overdue_only: bool,
}

/// Per-user dashboard: own top-level tasks bucketed by status.
#[derive(Debug, Default)]
pub struct Dashboard<'a> {
    pub todo: Vec<&'a Task>,
    pub reported: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
    /// Incomplete tasks whose due date is before today.
    pub overdue_count: usize,
}

impl Dashboard<'_> {
    /// Tasks not yet approved complete.
    pub fn incomplete_count(&self) -> usize {
        self.todo.len() + self.reported.len()
    }
}

/// Admin list view: top-level tasks under `filter`, due-date ascending.
///
/// Subtasks never appear here even when they match the filter fields.
pub fn admin_view<'a>(tasks: &'a [Task], filter: &FilterSpec, today: NaiveDate) -> Vec<&'a Task> {
    let selected = tasks
        .iter()
        .filter(|t| t.is_top_level())
        .filter(|t| {
            filter
                .assignee
                .as_ref()
                .is_none_or(|email| &t.assignee_email == email)
        })
        .filter(|t| filter.priority.is_none_or(|p| t.priority == p))
        .filter(|t| !filter.overdue_only || task_overdue(t, today))
        .collect();
    sorted_by_due(selected)
}

/// Per-user dashboard over the caller's own top-level tasks.
pub fn user_view<'a>(tasks: &'a [Task], email: &str, today: NaiveDate) -> Dashboard<'a> {
    let own = sorted_by_due(
        tasks
            .iter()
            .filter(|t| t.is_top_level() && t.assignee_email == email)
            .collect(),
    );

    let mut dashboard = Dashboard::default();
    for task in own {
        if task_overdue(task, today) {
            dashboard.overdue_count += 1;
        }
        match task.status {
            TaskStatus::Todo => dashboard.todo.push(task),
            TaskStatus::Reported => dashboard.reported.push(task),
            TaskStatus::Done => dashboard.done.push(task),
        }
    }
    dashboard
}

/// Subtasks of `parent`, oldest first.
pub fn subtasks_of(tasks: &[Task], parent: TaskId) -> Vec<&Task> {
    let mut subtasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.parent_task_id == Some(parent))
        .collect();
    subtasks.sort_by_key(|t| t.created_at);
    subtasks
}

/// `(completed, total)` subtask counts for a parent task.
pub fn subtask_progress(tasks: &[Task], parent: TaskId) -> (usize, usize) {
    let subtasks = subtasks_of(tasks, parent);
    let completed = subtasks.iter().filter(|t| t.is_done()).count();
    (completed, subtasks.len())
}

/// Overdue means incomplete and strictly past due.
fn task_overdue(task: &Task, today: NaiveDate) -> bool {
    task.status != TaskStatus::Done && is_overdue(task.due_date, today)
}

/// Ascending due date; the sort is stable, so ties keep insertion order.
fn sorted_by_due(mut tasks: Vec<&Task>) -> Vec<&Task> {
    tasks.sort_by_key(|t| t.due_date);
    tasks
}
