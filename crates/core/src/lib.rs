//! Tempo core - tasks, focus sessions and the stores that hold them.
//!
//! The command layer depends only on the [`store::TaskStore`] and
//! [`store::FocusStore`] traits; [`storage::Storage`] implements both.

pub mod config;
pub mod error;
pub mod focus;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Result, StoreError};
pub use focus::{FocusSession, FocusStats};
pub use storage::Storage;
pub use store::{FocusStore, TaskStore};
pub use task::{NewTask, Priority, Task, TaskChanges, TaskFilter, TaskStatus};
