//! User reference data.
//!
//! Users are provisioned externally and read-only to this core: the store
//! hands out the user set and the core only ever matches against it.

use serde::{Deserialize, Serialize};

/// Role of a user within the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Creates, edits, approves and deletes tasks.
    Admin,
    /// Works assigned tasks and reports completion.
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::User => write!(f, "USER"),
        }
    }
}

/// A known team member. `email` is the unique identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
}

impl User {
    pub fn new(email: &str, display_name: &str, role: UserRole) -> Self {
        Self {
            email: email.to_string(),
            display_name: display_name.to_string(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
