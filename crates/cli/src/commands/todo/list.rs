//! List tasks, grouped by status.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tempo_core::{Task, TaskFilter, TaskStatus, TaskStore};

use super::{priority_arg, priority_icon, status_arg, status_icon};
use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::format_short_date;
use crate::context::{ArgValue, CommandContext};
use crate::error::Result;

const INFO: CommandInfo = CommandInfo {
    name: "todo-list",
    description: "List all tasks with optional filters",
    usage: "/todo list [--status=pending] [--priority=high] [--tags=backend]",
    examples: &[
        "/todo list",
        "/todo list --status=pending",
        "/todo list --priority=high",
        "/todo list --tags=backend,urgent",
        "/todo list --status=pending --priority=high",
    ],
};

pub struct ListTasksCommand {
    tasks: Arc<dyn TaskStore>,
}

impl ListTasksCommand {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl Command for ListTasksCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        let filter = TaskFilter {
            status: status_arg(context)?,
            priority: priority_arg(context, &["priority"])?,
            tags: context.get("tags").map(ArgValue::to_list),
            ..Default::default()
        };

        let tasks = self.tasks.list(&filter).await?;
        if tasks.is_empty() {
            return Ok(self.success("No tasks found matching your filters", None));
        }

        let message = format_list(&tasks, Utc::now());
        let count = tasks.len();
        Ok(self.success(message, Some(json!({ "tasks": tasks, "count": count }))))
    }
}

fn format_list(tasks: &[Task], now: DateTime<Utc>) -> String {
    let mut message = format!("Your Tasks ({})\n\n", tasks.len());

    for status in TaskStatus::all() {
        let group: Vec<&Task> = tasks.iter().filter(|t| t.status == *status).collect();
        if group.is_empty() {
            continue;
        }

        message.push_str(&format!(
            "{} {} ({})\n",
            status_icon(*status),
            status.label(),
            group.len()
        ));
        for task in group {
            message.push_str(&format_item(task, now));
        }
        message.push('\n');
    }

    message
}

fn format_item(task: &Task, now: DateTime<Utc>) -> String {
    let mut item = format!("  {} [{}] {}", priority_icon(task.priority), task.id, task.title);

    if let Some(due) = task.due_date {
        if task.is_overdue(now) {
            item.push_str(" OVERDUE");
        } else {
            item.push_str(&format!(" due {}", format_short_date(due)));
        }
    }
    if !task.tags.is_empty() {
        item.push_str(&format!(" #{}", task.tags.join(" #")));
    }

    item.push('\n');
    item
}
