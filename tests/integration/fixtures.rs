//! Shared fixtures for integration tests.

use chrono::{Datelike, Duration, Local, NaiveDate};

use kanri::core::task::{Task, TaskPriority};
use kanri::core::user::{User, UserRole};
use kanri::extract::PatternExtractor;
use kanri::service::{NewTaskInput, TaskService};
use kanri::store::MemoryStore;

pub fn admin() -> User {
    User::new("boss@example.com", "社長", UserRole::Admin)
}

pub fn tanaka() -> User {
    User::new("tanaka@example.com", "田中", UserRole::User)
}

pub fn suzuki() -> User {
    User::new("suzuki@example.com", "鈴木", UserRole::User)
}

pub fn team() -> Vec<User> {
    vec![admin(), tanaka(), suzuki()]
}

/// Service over a fresh in-memory store, acting as the admin.
pub fn admin_service() -> TaskService<MemoryStore, PatternExtractor> {
    TaskService::new(MemoryStore::new(team(), "boss@example.com"), PatternExtractor)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// An `M/D` token `days` ahead of today.
pub fn mmdd_in(days: i64) -> String {
    let date = today() + Duration::days(days);
    format!("{}/{}", date.month(), date.day())
}

/// Create a top-level task assigned to `assignee` with a due date `days`
/// ahead, returning the created task.
pub async fn create_for(
    service: &TaskService<MemoryStore, PatternExtractor>,
    assignee: &str,
    title: &str,
    days: i64,
) -> Task {
    service
        .create_task(NewTaskInput::TopLevel {
            text: format!("{title} {}", mmdd_in(days)),
            assignee_email: assignee.to_string(),
            priority: TaskPriority::Medium,
        })
        .await
        .expect("task creation should succeed")
}
