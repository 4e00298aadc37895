//! Capability interfaces the command layer talks to.
//!
//! Commands only see these traits; [`crate::storage::Storage`] is the
//! implementation shipped with the workspace.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::focus::{FocusSession, FocusStats};
use crate::task::{NewTask, Task, TaskChanges, TaskFilter, TaskStatus};

/// Create/read/update/delete access to tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Creates a pending task and assigns it a fresh id.
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Looks up a task; `Ok(None)` when absent.
    async fn get(&self, id: u64) -> Result<Option<Task>>;

    /// Returns matching tasks ordered by priority (high first), due date
    /// (earliest first, undated last) and creation time (newest first).
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Applies `changes`. Moving to completed stamps `completed_at`.
    ///
    /// # Errors
    ///
    /// `StoreError::TaskNotFound` when the id is unknown.
    async fn update(&self, id: u64, changes: TaskChanges) -> Result<Task>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// `StoreError::TaskNotFound` when the id is unknown.
    async fn delete(&self, id: u64) -> Result<()>;

    /// Number of tasks per status; every status is present.
    async fn count_by_status(&self) -> Result<BTreeMap<TaskStatus, usize>>;

    /// Marks a task completed.
    async fn complete(&self, id: u64) -> Result<Task> {
        self.update(
            id,
            TaskChanges {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await
    }
}

/// Access to focus sessions. At most one session is open at a time.
#[async_trait]
pub trait FocusStore: Send + Sync {
    /// Opens a session.
    ///
    /// # Errors
    ///
    /// `StoreError::SessionInProgress` when a session is already open.
    async fn start(&self, duration: u32, break_time: u32) -> Result<FocusSession>;

    /// Closes the open session.
    ///
    /// # Errors
    ///
    /// `StoreError::NoActiveSession` when nothing is open.
    async fn stop(&self, interrupted: bool) -> Result<FocusSession>;

    /// The most recently started open session, if any.
    async fn active(&self) -> Result<Option<FocusSession>>;

    /// Statistics over sessions started within the last `window_days` days,
    /// or over all sessions when `None`.
    async fn stats(&self, window_days: Option<u32>) -> Result<FocusStats>;
}
