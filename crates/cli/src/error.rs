//! Error types for the Tempo command engine with diagnostics.

use miette::Diagnostic;
use tempo_core::StoreError;
use thiserror::Error;

/// Engine errors with diagnostic information.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Input held no command token
    #[error("Empty command")]
    #[diagnostic(
        code(tempo::input::empty),
        help("Type a command such as /todo list, or /help")
    )]
    EmptyCommand,

    /// Argument stored with a different type than requested
    #[error("Argument '{key}' is {found}, expected {expected}")]
    #[diagnostic(code(tempo::arg::type_mismatch))]
    ArgumentType {
        /// The argument key
        key: String,
        /// The requested type
        expected: &'static str,
        /// The stored type
        found: &'static str,
    },

    /// Required argument missing
    #[error("Missing required argument: {argument}")]
    #[diagnostic(code(tempo::arg::required))]
    MissingArgument {
        /// The name of the missing argument
        argument: String,
    },

    /// Argument present but unusable
    #[error("{reason}")]
    #[diagnostic(code(tempo::arg::invalid))]
    InvalidArgument {
        /// The name of the argument
        argument: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A store operation failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    /// Generic error
    #[error("{message}")]
    #[diagnostic(code(tempo::error))]
    Other {
        /// The error message
        message: String,
    },
}

impl CliError {
    /// Create an ArgumentType error
    pub fn argument_type(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::ArgumentType {
            key: key.into(),
            expected,
            found,
        }
    }

    /// Create a MissingArgument error
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, CliError>;

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other {
            message: err.to_string(),
        }
    }
}
