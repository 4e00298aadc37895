//! Add a task to the todo list.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tempo_core::{NewTask, Priority, TaskStore};

use super::{describe, due_arg, priority_arg, tags_arg, text};
use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::to_data;
use crate::context::{ArgValue, CommandContext};
use crate::error::Result;

const INFO: CommandInfo = CommandInfo {
    name: "todo-add",
    description: "Add a new task to your todo list",
    usage: r#"/todo add "<title>" [--priority=high] [--due=2024-12-31] [--tags=urgent,backend]"#,
    examples: &[
        r#"/todo add "Implement user authentication""#,
        r#"/todo add "Fix bug in payment" --priority=high --due=2024-12-15"#,
        r#"/todo add "Refactor API" --tags=backend,cleanup --priority=medium"#,
        r#"/todo add "Write documentation" --description="Update API docs with new endpoints""#,
    ],
};

/// `todo-add`: title from `--title` or the first positional argument.
pub struct AddTaskCommand {
    tasks: Arc<dyn TaskStore>,
}

impl AddTaskCommand {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl Command for AddTaskCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    fn validate(&self, context: &CommandContext) -> bool {
        let title_ok = matches!(
            context.first_of(&["title", "0"]),
            Some(ArgValue::String(title)) if !title.trim().is_empty()
        );
        // Priority spelling is checked exactly, without case folding.
        let priority_ok = match context.first_of(&["priority", "p"]) {
            None => true,
            Some(ArgValue::String(p)) => Priority::NAMES.contains(&p.as_str()),
            Some(_) => false,
        };
        title_ok && priority_ok
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        let now = Utc::now();
        let title = text(context, &["title", "0"]).unwrap_or_default();

        let new = NewTask {
            title,
            description: text(context, &["description"]),
            priority: Some(priority_arg(context, &["priority", "p"])?.unwrap_or_default()),
            due_date: due_arg(context, now)?,
            tags: tags_arg(context).unwrap_or_default(),
        };

        let task = self.tasks.create(new).await?;
        let message = format!("Task created successfully!\n\n{}", describe(&task));
        Ok(self.success(message, Some(to_data(&task)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_command;
    use tempo_core::{Storage, TaskFilter};

    fn command() -> (AddTaskCommand, Arc<Storage>) {
        let storage = Arc::new(Storage::in_memory());
        (AddTaskCommand::new(storage.clone()), storage)
    }

    #[test]
    fn test_validate_requires_title() {
        let (cmd, _) = command();
        assert!(cmd.validate(&parse_command("/todo add \"Ship it\"").unwrap().context));
        assert!(cmd.validate(&parse_command("/todo add --title=Ship").unwrap().context));
        assert!(!cmd.validate(&parse_command("/todo add").unwrap().context));
        assert!(!cmd.validate(&parse_command("/todo add \"  \"").unwrap().context));
    }

    #[test]
    fn test_validate_priority_is_case_sensitive() {
        let (cmd, _) = command();
        assert!(cmd.validate(&parse_command("/todo add x -p=low").unwrap().context));
        assert!(!cmd.validate(&parse_command("/todo add x --priority=High").unwrap().context));
        assert!(!cmd.validate(&parse_command("/todo add x --priority=urgent").unwrap().context));
    }

    #[tokio::test]
    async fn test_execute_creates_task() {
        let (cmd, storage) = command();
        let parsed = parse_command(
            "/todo add \"Fix bug\" --priority=high --due=2024-12-15 --tags=api,urgent --description=\"Null check\"",
        )
        .unwrap();

        let response = cmd.execute(&parsed.context).await.unwrap();
        assert!(response.success);
        assert!(response.message.contains("Title: Fix bug"));
        assert!(response.message.contains("Tags: api, urgent"));

        let tasks = storage.list(&TaskFilter::default()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].description.as_deref(), Some("Null check"));
        assert_eq!(tasks[0].tags, vec!["api".to_string(), "urgent".to_string()]);
        assert!(tasks[0].due_date.is_some());

        let data = response.data.unwrap();
        assert_eq!(data["priority"], "HIGH");
        assert_eq!(data["status"], "PENDING");
    }

    #[tokio::test]
    async fn test_execute_defaults_to_medium() {
        let (cmd, _) = command();
        let parsed = parse_command("/todo add Groceries").unwrap();
        let response = cmd.execute(&parsed.context).await.unwrap();
        assert_eq!(response.data.unwrap()["priority"], "MEDIUM");
    }

    #[tokio::test]
    async fn test_bad_due_date_is_an_error() {
        let (cmd, storage) = command();
        let parsed = parse_command("/todo add x --due=someday").unwrap();
        let err = cmd.execute(&parsed.context).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid date format: someday"));
        assert!(storage.list(&TaskFilter::default()).await.unwrap().is_empty());
    }
}
