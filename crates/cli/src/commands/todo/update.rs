//! Change fields of an existing task.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tempo_core::{TaskChanges, TaskStore};

use super::{describe, due_arg, priority_arg, status_arg, tags_arg, task_id, text};
use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::to_data;
use crate::context::CommandContext;
use crate::error::{CliError, Result};

const INFO: CommandInfo = CommandInfo {
    name: "todo-update",
    description: "Update the fields of a task",
    usage: "/todo update <task_id> [--title=..] [--description=..] [--status=..] [--priority=..] [--due=..] [--tags=..]",
    examples: &[
        "/todo update 3 --status=in_progress",
        r#"/todo update 3 --title="Ship v2" --priority=high"#,
        "/todo update 7 --due=tomorrow --tags=home,weekend",
    ],
};

pub struct UpdateTaskCommand {
    tasks: Arc<dyn TaskStore>,
}

impl UpdateTaskCommand {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl Command for UpdateTaskCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    fn validate(&self, context: &CommandContext) -> bool {
        task_id(context).is_some()
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        let id = task_id(context).ok_or_else(|| CliError::missing_argument("id"))?;

        let changes = TaskChanges {
            title: text(context, &["title"]),
            description: text(context, &["description"]),
            status: status_arg(context)?,
            priority: priority_arg(context, &["priority", "p"])?,
            due_date: due_arg(context, Utc::now())?,
            tags: tags_arg(context),
        };
        if changes.is_empty() {
            return Ok(self.error(
                "Nothing to update",
                Some("Pass at least one of --title, --description, --status, --priority, --due, --tags".into()),
            ));
        }

        if self.tasks.get(id).await?.is_none() {
            return Ok(self.error(format!("Task {id} not found"), None));
        }

        let task = self.tasks.update(id, changes).await?;
        let message = format!("Task Updated\n\n{}", describe(&task));
        Ok(self.success(message, Some(to_data(&task)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_command;
    use tempo_core::{NewTask, Priority, Storage, TaskStatus};

    async fn command() -> (UpdateTaskCommand, Arc<Storage>) {
        let storage = Arc::new(Storage::in_memory());
        storage.create(NewTask::new("Draft")).await.unwrap();
        (UpdateTaskCommand::new(storage.clone()), storage)
    }

    #[tokio::test]
    async fn test_applies_changes() {
        let (cmd, storage) = command().await;
        let ctx = parse_command(r#"/todo update 1 --title="Final draft" --status=in_progress -p=high"#)
            .unwrap()
            .context;

        let response = cmd.execute(&ctx).await.unwrap();
        assert!(response.success, "{response:?}");

        let task = storage.get(1).await.unwrap().unwrap();
        assert_eq!(task.title, "Final draft");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_requires_some_change() {
        let (cmd, _) = command().await;
        let response = cmd
            .execute(&parse_command("/todo update 1").unwrap().context)
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "Nothing to update");
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let (cmd, _) = command().await;
        let response = cmd
            .execute(&parse_command("/todo update 8 --title=x").unwrap().context)
            .await
            .unwrap();
        assert_eq!(response.message, "Task 8 not found");
    }
}
