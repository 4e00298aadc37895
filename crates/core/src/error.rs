//! Error types for the task and focus-session stores.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Store failures with diagnostic information.
#[derive(Error, Debug, Diagnostic)]
pub enum StoreError {
    /// No task with the requested id exists
    #[error("Task {id} not found")]
    #[diagnostic(
        code(tempo::task::not_found),
        help("List your tasks with: /todo list")
    )]
    TaskNotFound {
        /// The id that was looked up
        id: u64,
    },

    /// A focus session is still open
    #[error("A focus session is already in progress")]
    #[diagnostic(
        code(tempo::focus::in_progress),
        help("Use /focus stop to end it first")
    )]
    SessionInProgress,

    /// No focus session is open
    #[error("No active focus session found")]
    #[diagnostic(
        code(tempo::focus::no_active),
        help("Use /focus start to begin one")
    )]
    NoActiveSession,

    /// Reading or writing the snapshot file failed
    #[error("IO error at {}: {source}", .path.display())]
    #[diagnostic(
        code(tempo::store::io),
        help("Check that the data file's directory exists and is writable")
    )]
    Io {
        /// The file or directory being read or written
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded
    #[error("Snapshot is not valid JSON: {message}")]
    #[diagnostic(
        code(tempo::store::serialization),
        help("Fix or remove the data file; it is rewritten on the next change")
    )]
    Serialization {
        /// The underlying error message
        message: String,
    },
}

impl StoreError {
    /// Create a TaskNotFound error
    pub fn task_not_found(id: u64) -> Self {
        Self::TaskNotFound { id }
    }

    /// Create an IoError bound to a path
    pub fn io_error(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
