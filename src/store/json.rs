//! JSON-file-backed task store.
//!
//! [`MemoryStore`](super::MemoryStore) semantics persisted to a single
//! JSON document after every mutation. Mutations are applied to a working
//! copy and committed only once the file write succeeds, so a failed write
//! leaves both the file and the in-memory state unchanged.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::task::{Task, TaskId};
use crate::core::user::User;
use crate::error::{Error, Result};
use crate::klog_debug;

use super::{memory::MemoryStore, NewTaskRecord, TaskPatch, TaskStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    current_user: String,
    users: Vec<User>,
    tasks: Vec<Task>,
}

pub struct JsonStore {
    path: PathBuf,
    state: Mutex<StoreFile>,
}

impl JsonStore {
    /// Open the store at `path`, seeding a fresh file with `users` and
    /// `current_email` when none exists yet.
    pub async fn open(path: &Path, users: Vec<User>, current_email: &str) -> Result<Self> {
        let state = match tokio::fs::read_to_string(path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| remote("decoding task store", &e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                klog_debug!("JsonStore: seeding new store at {}", path.display());
                let state = StoreFile {
                    current_user: current_email.to_string(),
                    users,
                    tasks: Vec::new(),
                };
                write_file(path, &state).await?;
                state
            }
            Err(e) => return Err(remote("reading task store", &e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        })
    }

    /// Switch the acting user. The email must belong to a known user.
    pub async fn set_current_user(&self, email: &str) -> Result<User> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| Error::UnknownUser(email.to_string()))?;

        let mut next = state.clone();
        next.current_user = user.email.clone();
        write_file(&self.path, &next).await?;
        *state = next;
        Ok(user)
    }
}

/// Failures talking to the backing file surface as remote-operation
/// errors with the underlying reason appended.
fn remote(context: &str, reason: &dyn std::fmt::Display) -> Error {
    Error::Remote(format!("{context}: {reason}"))
}

async fn write_file(path: &Path, state: &StoreFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| remote("preparing task store directory", &e))?;
    }
    let raw = serde_json::to_string_pretty(state).map_err(|e| remote("encoding task store", &e))?;
    tokio::fs::write(path, raw)
        .await
        .map_err(|e| remote("writing task store", &e))?;
    Ok(())
}

#[async_trait]
impl TaskStore for JsonStore {
    async fn current_user(&self) -> Result<User> {
        let state = self.state.lock().await;
        state
            .users
            .iter()
            .find(|u| u.email == state.current_user)
            .cloned()
            .ok_or_else(|| Error::UnknownUser(state.current_user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.state.lock().await.users.clone())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.state.lock().await.tasks.clone())
    }

    async fn create_task(&self, record: NewTaskRecord) -> Result<Task> {
        let mut state = self.state.lock().await;
        let task = MemoryStore::build_task(record);

        let mut next = state.clone();
        next.tasks.push(task.clone());
        write_file(&self.path, &next).await?;
        *state = next;
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let task = next
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        MemoryStore::apply_patch(task, patch);
        let updated = task.clone();

        write_file(&self.path, &next).await?;
        *state = next;
        Ok(updated)
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.tasks.iter().any(|t| t.id == id) {
            return Err(Error::TaskNotFound(id));
        }

        let mut next = state.clone();
        next.tasks
            .retain(|t| t.id != id && t.parent_task_id != Some(id));
        write_file(&self.path, &next).await?;
        *state = next;
        Ok(())
    }
}
