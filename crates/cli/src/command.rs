//! The command contract and the uniform response type.

use async_trait::async_trait;
use serde::Serialize;

use crate::context::CommandContext;
use crate::error::Result;

/// Identity of a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    /// Dispatch key, e.g. `todo-add`
    pub name: &'static str,
    /// One-line description shown in help
    pub description: &'static str,
    /// Usage syntax, e.g. `/todo done <task_id>`
    pub usage: &'static str,
    /// Example invocations
    pub examples: &'static [&'static str],
}

/// Result of running a command, ready for display.
///
/// `error` is only meaningful when `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn success(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

/// Trait implemented by every command handler.
///
/// # Execution Flow
///
/// The registry resolves a command by [`CommandInfo::name`], calls
/// [`Command::validate`] and only when it passes awaits [`Command::execute`].
/// `execute` is the only place allowed to touch the stores.
///
/// # Example
///
/// ```rust,ignore
/// pub struct PingCommand;
///
/// #[async_trait]
/// impl Command for PingCommand {
///     fn info(&self) -> &CommandInfo {
///         &CommandInfo {
///             name: "ping",
///             description: "Check that the engine answers",
///             usage: "/ping",
///             examples: &["/ping"],
///         }
///     }
///
///     async fn execute(&self, _context: &CommandContext) -> Result<CommandResponse> {
///         Ok(self.success("pong", None))
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync {
    /// Identity metadata
    fn info(&self) -> &CommandInfo;

    fn name(&self) -> &str {
        self.info().name
    }

    fn description(&self) -> &str {
        self.info().description
    }

    fn usage(&self) -> &str {
        self.info().usage
    }

    fn examples(&self) -> &[&'static str] {
        self.info().examples
    }

    /// Rejects malformed input before execution. Accepts everything by default.
    fn validate(&self, _context: &CommandContext) -> bool {
        true
    }

    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Any error is turned into a failure response by the registry.
    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse>;

    /// Success response helper
    fn success(&self, message: impl Into<String>, data: Option<serde_json::Value>) -> CommandResponse
    where
        Self: Sized,
    {
        CommandResponse::success(message, data)
    }

    /// Failure response helper
    fn error(&self, message: impl Into<String>, detail: Option<String>) -> CommandResponse
    where
        Self: Sized,
    {
        CommandResponse::failure(message, detail)
    }
}
