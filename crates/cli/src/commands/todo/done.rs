//! Mark a task as completed.

use async_trait::async_trait;
use std::sync::Arc;
use tempo_core::TaskStore;

use super::task_id;
use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::{format_date_time, to_data};
use crate::context::CommandContext;
use crate::error::{CliError, Result};

const INFO: CommandInfo = CommandInfo {
    name: "todo-done",
    description: "Mark a task as completed",
    usage: "/todo done <task_id>",
    examples: &["/todo done 1", "/todo done 42"],
};

pub struct CompleteTaskCommand {
    tasks: Arc<dyn TaskStore>,
}

impl CompleteTaskCommand {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl Command for CompleteTaskCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    fn validate(&self, context: &CommandContext) -> bool {
        task_id(context).is_some()
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        let id = task_id(context).ok_or_else(|| CliError::missing_argument("id"))?;

        if self.tasks.get(id).await?.is_none() {
            return Ok(self.error(format!("Task {id} not found"), None));
        }

        let task = self.tasks.complete(id).await?;
        let completed_at = task.completed_at.map(format_date_time).unwrap_or_default();
        let message = format!(
            "Task Completed!\n\nID: {}\nTitle: {}\nCompleted at: {}",
            task.id, task.title, completed_at
        );
        Ok(self.success(message, Some(to_data(&task)?)))
    }
}
