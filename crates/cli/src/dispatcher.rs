//! Entry point for one input line: parse, resolve, execute.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempo_core::config::FocusDefaults;
use tempo_core::{FocusStore, TaskStatus, TaskStore};
use tracing::{debug, warn};

use crate::command::CommandResponse;
use crate::commands::{focus, todo};
use crate::error::Result;
use crate::parser::parse_command;
use crate::registry::CommandRegistry;

/// Engine overview returned by [`Dispatcher::stats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotStats {
    pub total_commands: usize,
    pub task_counts: BTreeMap<TaskStatus, usize>,
}

/// Owns the registry and the task store used for stats.
pub struct Dispatcher {
    registry: CommandRegistry,
    tasks: Arc<dyn TaskStore>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, tasks: Arc<dyn TaskStore>) -> Self {
        Self { registry, tasks }
    }

    /// Dispatcher with every todo and focus command registered.
    pub fn with_defaults(
        tasks: Arc<dyn TaskStore>,
        sessions: Arc<dyn FocusStore>,
        defaults: FocusDefaults,
    ) -> Self {
        let mut registry = CommandRegistry::new();

        registry.register(todo::AddTaskCommand::new(tasks.clone()));
        registry.register(todo::ListTasksCommand::new(tasks.clone()));
        registry.register(todo::CompleteTaskCommand::new(tasks.clone()));
        registry.register(todo::DeleteTaskCommand::new(tasks.clone()));
        registry.register(todo::UpdateTaskCommand::new(tasks.clone()));

        registry.register(focus::StartFocusCommand::new(sessions.clone(), defaults));
        registry.register(focus::StopFocusCommand::new(sessions.clone()));
        registry.register(focus::FocusStatsCommand::new(sessions));

        Self::new(registry, tasks)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parses `input` and executes the resolved command.
    ///
    /// # Errors
    ///
    /// `CliError::EmptyCommand` when the line holds no command. Every other
    /// failure is reported inside the response.
    pub async fn dispatch(&self, input: &str) -> Result<CommandResponse> {
        let parsed = parse_command(input)?;
        let full_name = parsed.full_name();
        debug!(command = %full_name, "Dispatching");
        Ok(self.registry.execute(&full_name, &parsed.context).await)
    }

    /// Like [`Dispatcher::dispatch`] but never fails.
    pub async fn process(&self, input: &str) -> CommandResponse {
        match self.dispatch(input).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Failed to process command");
                CommandResponse::failure("Failed to process command", Some(err.to_string()))
            }
        }
    }

    pub fn help(&self) -> String {
        self.registry.help_text()
    }

    pub fn command_help(&self, name: &str) -> String {
        self.registry.command_help(name)
    }

    /// Registered command count and tasks per status.
    pub async fn stats(&self) -> Result<BotStats> {
        Ok(BotStats {
            total_commands: self.registry.len(),
            task_counts: self.tasks.count_by_status().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::Storage;

    fn dispatcher() -> Dispatcher {
        let storage = Arc::new(Storage::in_memory());
        Dispatcher::with_defaults(storage.clone(), storage, FocusDefaults::default())
    }

    #[tokio::test]
    async fn test_registers_every_command_in_order() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.registry().names(),
            vec![
                "todo-add",
                "todo-list",
                "todo-done",
                "todo-delete",
                "todo-update",
                "focus-start",
                "focus-stop",
                "focus-stats",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_input_is_an_error() {
        let dispatcher = dispatcher();
        assert!(matches!(
            dispatcher.dispatch("   ").await,
            Err(crate::error::CliError::EmptyCommand)
        ));

        let response = dispatcher.process("/").await;
        assert!(!response.success);
        assert_eq!(response.message, "Failed to process command");
        assert_eq!(response.error.as_deref(), Some("Empty command"));
    }

    #[tokio::test]
    async fn test_unknown_subcommand() {
        let response = dispatcher().process("/focus pause").await;
        assert!(!response.success);
        assert_eq!(response.message, "Unknown command: focus-pause");
    }

    #[tokio::test]
    async fn test_stats_counts_tasks() {
        let dispatcher = dispatcher();
        dispatcher.process("/todo add \"One\"").await;
        dispatcher.process("/todo add \"Two\"").await;
        dispatcher.process("/todo done 1").await;

        let stats = dispatcher.stats().await.unwrap();
        assert_eq!(stats.total_commands, 8);
        assert_eq!(stats.task_counts[&TaskStatus::Pending], 1);
        assert_eq!(stats.task_counts[&TaskStatus::Completed], 1);
    }

    #[tokio::test]
    async fn test_command_help_for_registered_name() {
        let dispatcher = dispatcher();
        assert!(dispatcher.command_help("todo-add").starts_with("/todo-add\n"));
        assert!(dispatcher.help().contains("/focus-stats"));
    }
}
