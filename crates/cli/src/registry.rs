//! Command registry: resolve, validate, execute, wrap.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::command::{Command, CommandResponse};
use crate::context::CommandContext;

/// Owns the registered commands, in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its name.
    ///
    /// An existing command with the same name is replaced in its original
    /// slot and returned.
    pub fn register(&mut self, command: impl Command + 'static) -> Option<Arc<dyn Command>> {
        self.register_arc(Arc::new(command))
    }

    /// Same as [`CommandRegistry::register`] for an already shared command.
    pub fn register_arc(&mut self, command: Arc<dyn Command>) -> Option<Arc<dyn Command>> {
        let name = command.name().to_string();
        let previous = match self.position(&name) {
            Some(index) => {
                warn!(command = %name, "Command already registered, overwriting");
                Some(std::mem::replace(&mut self.commands[index], command))
            }
            None => {
                self.commands.push(command);
                None
            }
        };
        info!(command = %name, "Registered command");
        previous
    }

    /// Removes a command. Returns whether something was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.commands.remove(index);
                info!(command = %name, "Unregistered command");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.name() == name)
    }

    /// Executes the command registered as `full_name`.
    ///
    /// Never fails: unknown names, rejected input, handler errors and handler
    /// panics all come back as failure responses.
    pub async fn execute(&self, full_name: &str, context: &CommandContext) -> CommandResponse {
        let Some(command) = self.get(full_name) else {
            return CommandResponse::failure(
                format!("Unknown command: {full_name}"),
                Some(format!("Available commands: {}", self.names().join(", "))),
            );
        };

        if !command.validate(context) {
            return CommandResponse::failure(
                "Invalid command input",
                Some(format!(
                    "Usage: {}\n\nExamples:\n{}",
                    command.usage(),
                    command.examples().join("\n")
                )),
            );
        }

        info!(command = %full_name, "Executing command");
        debug!(args = ?context.iter().collect::<Vec<_>>(), "Command arguments");

        // Spawned so a panicking handler is contained; awaited right away.
        let handler = Arc::clone(command);
        let owned = context.clone();
        let outcome = tokio::spawn(async move { handler.execute(&owned).await }).await;

        match outcome {
            Ok(Ok(response)) => {
                info!(
                    command = %full_name,
                    success = response.success,
                    "Command completed"
                );
                response
            }
            Ok(Err(err)) => {
                error!(command = %full_name, error = %err, "Command failed");
                let message = err.to_string();
                CommandResponse::failure(
                    "Command execution failed",
                    Some(if message.is_empty() {
                        "Unknown error".to_string()
                    } else {
                        message
                    }),
                )
            }
            Err(join_err) => {
                error!(command = %full_name, error = %join_err, "Command panicked");
                CommandResponse::failure("Command execution failed", Some("Unknown error".into()))
            }
        }
    }

    /// Help for every command, in registration order.
    pub fn help_text(&self) -> String {
        let mut help = String::from("Available Commands\n\n");
        for command in &self.commands {
            help.push_str(&format!("/{}\n", command.name()));
            help.push_str(&format!("  {}\n", command.description()));
            help.push_str(&format!("  Usage: {}\n", command.usage()));
            help.push_str("  Examples:\n");
            for example in command.examples() {
                help.push_str(&format!("    {example}\n"));
            }
            help.push('\n');
        }
        help
    }

    /// Help for one command, or `Command not found: <name>`.
    pub fn command_help(&self, name: &str) -> String {
        let Some(command) = self.get(name) else {
            return format!("Command not found: {name}");
        };

        let mut help = format!("/{}\n\n", command.name());
        help.push_str(&format!("{}\n\n", command.description()));
        help.push_str(&format!("Usage: {}\n\n", command.usage()));
        help.push_str("Examples:\n");
        for example in command.examples() {
            help.push_str(&format!("  {example}\n"));
        }
        help
    }
}
