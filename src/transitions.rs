//! Status transition rules and authorization.
//!
//! Top-level graph:
//!
//! ```text
//! TODO -> REPORTED -> DONE
//!           |
//!           +-> TODO   (admin send-back)
//! ```
//!
//! DONE is terminal for the top-level graph. Subtasks reuse the same three
//! states but additionally support a direct `TODO <-> DONE` checkbox
//! toggle that bypasses REPORTED, see [`toggle_target`].

use crate::core::task::{Task, TaskStatus};
use crate::core::user::User;
use crate::error::{Error, Result};

/// Check if a transition between two statuses is on the legal graph.
///
/// Authorization is a separate concern, see [`authorize`].
pub fn is_legal(from: TaskStatus, to: TaskStatus) -> bool {
    matches!(
        (from, to),
        (TaskStatus::Todo, TaskStatus::Reported)
            | (TaskStatus::Reported, TaskStatus::Done)
            | (TaskStatus::Reported, TaskStatus::Todo)
    )
}

/// Validate that `actor` may move `task` to `to`.
///
/// - `TODO -> REPORTED`: only the task's assignee.
/// - `REPORTED -> DONE` / `REPORTED -> TODO`: only an admin.
///
/// Anything off the legal graph is [`Error::InvalidTransition`] regardless
/// of the actor.
pub fn authorize(actor: &User, task: &Task, to: TaskStatus) -> Result<()> {
    match (task.status, to) {
        (TaskStatus::Todo, TaskStatus::Reported) => {
            if actor.email == task.assignee_email {
                Ok(())
            } else {
                Err(Error::Forbidden(
                    "only the assignee can report completion".to_string(),
                ))
            }
        }
        (TaskStatus::Reported, TaskStatus::Done) | (TaskStatus::Reported, TaskStatus::Todo) => {
            if actor.is_admin() {
                Ok(())
            } else {
                Err(Error::Forbidden(
                    "only an admin can approve or send back a report".to_string(),
                ))
            }
        }
        (from, to) => Err(Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Target status for the subtask checkbox toggle.
///
/// DONE toggles back to TODO; everything else (including REPORTED) toggles
/// straight to DONE.
pub fn toggle_target(status: TaskStatus) -> TaskStatus {
    if status == TaskStatus::Done {
        TaskStatus::Todo
    } else {
        TaskStatus::Done
    }
}

/// Check whether `actor` can view `task`.
///
/// Admins see everything; others see tasks assigned to them, and subtasks
/// nested under a task assigned to them. The subtask toggle is open to
/// exactly this set.
pub fn can_view(actor: &User, task: &Task, parent: Option<&Task>) -> bool {
    actor.is_admin()
        || actor.email == task.assignee_email
        || parent.is_some_and(|p| p.assignee_email == actor.email)
}
