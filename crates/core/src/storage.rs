//! Task and focus-session storage.
//!
//! State lives in memory behind an async mutex. When opened with a path the
//! whole state is written back as a JSON snapshot after every mutation. A
//! mutation only becomes visible once its snapshot has been written.

use async_trait::async_trait;
use chrono::{Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::focus::{FocusSession, FocusStats};
use crate::store::{FocusStore, TaskStore};
use crate::task::{NewTask, Task, TaskChanges, TaskFilter, TaskStatus};

/// Serialized state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default)]
    last_task_id: u64,
    #[serde(default)]
    last_session_id: u64,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    sessions: Vec<FocusSession>,
}

/// Storage backing both [`TaskStore`] and [`FocusStore`].
pub struct Storage {
    path: Option<PathBuf>,
    state: Mutex<Snapshot>,
}

impl Storage {
    /// Storage that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(Snapshot::default()),
        }
    }

    /// Opens storage backed by `path`, loading the snapshot if it exists.
    ///
    /// # Errors
    ///
    /// IO errors reading the file, or a snapshot that is not valid JSON.
    pub async fn open(path: &Path) -> Result<Self> {
        let snapshot = match tokio::fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => Snapshot::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(err) => return Err(StoreError::io_error(err, path)),
        };

        info!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            sessions = snapshot.sessions.len(),
            "Opened storage"
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            state: Mutex::new(snapshot),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io_error(e, parent))?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| StoreError::io_error(e, path))?;
        debug!(path = %path.display(), "Snapshot written");
        Ok(())
    }

    /// Applies `change` to a copy of the state, persists the copy and only
    /// then swaps it in. On any error the state is left untouched.
    async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut Snapshot) -> Result<T> + Send,
        T: Send,
    {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let output = change(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(output)
    }
}

fn listing_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

#[async_trait]
impl TaskStore for Storage {
    async fn create(&self, new: NewTask) -> Result<Task> {
        let task = self
            .mutate(|state| {
                let now = Utc::now();
                state.last_task_id += 1;

                let task = Task {
                    id: state.last_task_id,
                    title: new.title,
                    description: new.description,
                    status: TaskStatus::Pending,
                    priority: new.priority.unwrap_or_default(),
                    due_date: new.due_date,
                    tags: new.tags,
                    created_at: now,
                    updated_at: now,
                    completed_at: None,
                };
                state.tasks.push(task.clone());
                Ok(task)
            })
            .await?;

        info!(id = task.id, title = %task.title, "Task created");
        Ok(task)
    }

    async fn get(&self, id: u64) -> Result<Option<Task>> {
        let state = self.state.lock().await;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let state = self.state.lock().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(listing_order);
        Ok(tasks)
    }

    async fn update(&self, id: u64, changes: TaskChanges) -> Result<Task> {
        let task = self
            .mutate(|state| {
                let now = Utc::now();
                let task = state
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(|| StoreError::task_not_found(id))?;

                if let Some(title) = changes.title.filter(|t| !t.is_empty()) {
                    task.title = title;
                }
                if let Some(description) = changes.description {
                    task.description = Some(description);
                }
                if let Some(status) = changes.status {
                    task.status = status;
                    if status == TaskStatus::Completed {
                        task.completed_at = Some(now);
                    }
                }
                if let Some(priority) = changes.priority {
                    task.priority = priority;
                }
                if let Some(due) = changes.due_date {
                    task.due_date = Some(due);
                }
                if let Some(tags) = changes.tags {
                    task.tags = tags;
                }
                task.updated_at = now;
                Ok(task.clone())
            })
            .await?;

        info!(id, "Task updated");
        Ok(task)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.mutate(|state| {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != id);
            if state.tasks.len() == before {
                return Err(StoreError::task_not_found(id));
            }
            Ok(())
        })
        .await?;
        info!(id, "Task deleted");
        Ok(())
    }

    async fn count_by_status(&self) -> Result<BTreeMap<TaskStatus, usize>> {
        let state = self.state.lock().await;
        let mut counts: BTreeMap<TaskStatus, usize> =
            TaskStatus::all().iter().map(|s| (*s, 0)).collect();
        for task in &state.tasks {
            *counts.entry(task.status).or_default() += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl FocusStore for Storage {
    async fn start(&self, duration: u32, break_time: u32) -> Result<FocusSession> {
        let session = self
            .mutate(|state| {
                if state.sessions.iter().any(FocusSession::is_open) {
                    return Err(StoreError::SessionInProgress);
                }

                state.last_session_id += 1;
                let session = FocusSession {
                    id: state.last_session_id,
                    duration,
                    break_time,
                    started_at: Utc::now(),
                    completed_at: None,
                    interrupted: false,
                };
                state.sessions.push(session.clone());
                Ok(session)
            })
            .await?;

        info!(id = session.id, duration, "Focus session started");
        Ok(session)
    }

    async fn stop(&self, interrupted: bool) -> Result<FocusSession> {
        let session = self
            .mutate(|state| {
                let session = state
                    .sessions
                    .iter_mut()
                    .filter(|s| s.is_open())
                    .max_by_key(|s| s.started_at)
                    .ok_or(StoreError::NoActiveSession)?;

                session.completed_at = Some(Utc::now());
                session.interrupted = interrupted;
                Ok(session.clone())
            })
            .await?;

        info!(id = session.id, interrupted, "Focus session stopped");
        Ok(session)
    }

    async fn active(&self) -> Result<Option<FocusSession>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .iter()
            .filter(|s| s.is_open())
            .max_by_key(|s| s.started_at)
            .cloned())
    }

    async fn stats(&self, window_days: Option<u32>) -> Result<FocusStats> {
        let state = self.state.lock().await;
        let since = window_days.map(|days| Utc::now() - Duration::days(i64::from(days)));
        let sessions: Vec<FocusSession> = state
            .sessions
            .iter()
            .filter(|s| since.map_or(true, |since| s.started_at >= since))
            .cloned()
            .collect();
        Ok(FocusStats::compute(&sessions, Local::now().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tempo-storage-{}-{}", std::process::id(), name))
            .join("tempo.json")
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let storage = Storage::in_memory();
        let a = storage.create(NewTask::new("a")).await.unwrap();
        let b = storage.create(NewTask::new("b")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.status, TaskStatus::Pending);
        assert_eq!(a.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn test_list_orders_by_priority_then_due() {
        let storage = Storage::in_memory();
        let now = Utc::now();
        storage.create(NewTask::new("low")).await.unwrap();
        storage
            .create(NewTask {
                priority: Some(Priority::High),
                ..NewTask::new("high undated")
            })
            .await
            .unwrap();
        storage
            .create(NewTask {
                priority: Some(Priority::High),
                due_date: Some(now),
                ..NewTask::new("high dated")
            })
            .await
            .unwrap();

        let titles: Vec<String> = storage
            .list(&TaskFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["high dated", "high undated", "low"]);
    }

    #[tokio::test]
    async fn test_complete_stamps_completion() {
        let storage = Storage::in_memory();
        let task = storage.create(NewTask::new("a")).await.unwrap();
        let done = storage.complete(task.id).await.unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        let counts = storage.count_by_status().await.unwrap();
        assert_eq!(counts[&TaskStatus::Completed], 1);
        assert_eq!(counts[&TaskStatus::Pending], 0);
        assert_eq!(counts.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_task_errors() {
        let storage = Storage::in_memory();
        assert!(matches!(
            storage.delete(9).await,
            Err(StoreError::TaskNotFound { id: 9 })
        ));
        assert!(matches!(
            storage.update(9, TaskChanges::default()).await,
            Err(StoreError::TaskNotFound { id: 9 })
        ));
        assert_eq!(storage.get(9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_single_open_session() {
        let storage = Storage::in_memory();
        assert!(matches!(
            storage.stop(false).await,
            Err(StoreError::NoActiveSession)
        ));

        let session = storage.start(25, 5).await.unwrap();
        assert!(matches!(
            storage.start(25, 5).await,
            Err(StoreError::SessionInProgress)
        ));
        assert_eq!(storage.active().await.unwrap(), Some(session.clone()));

        let stopped = storage.stop(true).await.unwrap();
        assert_eq!(stopped.id, session.id);
        assert!(stopped.interrupted);
        assert_eq!(storage.active().await.unwrap(), None);

        let stats = storage.stats(Some(7)).await.unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.completion_rate, 0);
    }

    #[tokio::test]
    async fn test_snapshot_round_trips_through_file() {
        let path = temp_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        {
            let storage = Storage::open(&path).await.unwrap();
            storage.create(NewTask::new("persisted")).await.unwrap();
            storage.start(30, 10).await.unwrap();
        }

        let reopened = Storage::open(&path).await.unwrap();
        let tasks = reopened.list(&TaskFilter::default()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "persisted");
        assert_eq!(reopened.active().await.unwrap().map(|s| s.duration), Some(30));

        let next = reopened.create(NewTask::new("next")).await.unwrap();
        assert_eq!(next.id, 2);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_invalid_snapshot_is_reported() {
        let path = temp_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let result = Storage::open(&path).await;
        assert!(matches!(result, Err(StoreError::Serialization { .. })));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_untouched() {
        let path = temp_path("unwritable");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        let storage = Storage::open(&path).await.unwrap();
        storage.create(NewTask::new("kept")).await.unwrap();
        storage.start(25, 5).await.unwrap();

        // A directory where the snapshot file should be makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir_all(&path).unwrap();

        let err = storage.create(NewTask::new("lost")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        let rename = TaskChanges {
            title: Some("renamed".into()),
            ..Default::default()
        };
        assert!(storage.update(1, rename).await.is_err());
        assert!(storage.delete(1).await.is_err());
        assert!(storage.stop(false).await.is_err());

        let tasks = storage.list(&TaskFilter::default()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "kept");
        assert!(storage.active().await.unwrap().is_some());

        // Once writable again the id counter continues where it was.
        std::fs::remove_dir_all(&path).unwrap();
        let next = storage.create(NewTask::new("next")).await.unwrap();
        assert_eq!(next.id, 2);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
