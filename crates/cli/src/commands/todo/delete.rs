//! Delete a task.

use async_trait::async_trait;
use std::sync::Arc;
use tempo_core::TaskStore;

use super::task_id;
use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::to_data;
use crate::context::CommandContext;
use crate::error::{CliError, Result};

const INFO: CommandInfo = CommandInfo {
    name: "todo-delete",
    description: "Delete a task",
    usage: "/todo delete <task_id>",
    examples: &["/todo delete 1", "/todo delete 42"],
};

pub struct DeleteTaskCommand {
    tasks: Arc<dyn TaskStore>,
}

impl DeleteTaskCommand {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl Command for DeleteTaskCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    fn validate(&self, context: &CommandContext) -> bool {
        task_id(context).is_some()
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        let id = task_id(context).ok_or_else(|| CliError::missing_argument("id"))?;

        let Some(task) = self.tasks.get(id).await? else {
            return Ok(self.error(format!("Task {id} not found"), None));
        };

        self.tasks.delete(id).await?;
        let message = format!("Task Deleted\n\nID: {}\nTitle: {}", id, task.title);
        Ok(self.success(message, Some(to_data(&task)?)))
    }
}
