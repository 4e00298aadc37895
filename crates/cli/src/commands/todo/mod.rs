//! `/todo` commands over the task store.

mod add;
mod delete;
mod done;
mod list;
mod update;

pub use add::AddTaskCommand;
pub use delete::DeleteTaskCommand;
pub use done::CompleteTaskCommand;
pub use list::ListTasksCommand;
pub use update::UpdateTaskCommand;

use chrono::{DateTime, Utc};
use console::Emoji;
use tempo_core::task::parse_due_date;
use tempo_core::{Priority, Task, TaskStatus};

use crate::context::{integer_value, ArgValue, CommandContext};
use crate::error::{CliError, Result};

static HIGH: Emoji<'_, '_> = Emoji("🔴", "(!)");
static MEDIUM: Emoji<'_, '_> = Emoji("🟡", "(-)");
static LOW: Emoji<'_, '_> = Emoji("🟢", "( )");

pub(crate) fn priority_icon(priority: Priority) -> String {
    match priority {
        Priority::High => &HIGH,
        Priority::Medium => &MEDIUM,
        Priority::Low => &LOW,
    }
    .to_string()
}

pub(crate) fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "⏳",
        TaskStatus::InProgress => "🔄",
        TaskStatus::Completed => "✅",
        TaskStatus::Cancelled => "❌",
    }
}

/// Positive task id from `--id` or the first positional argument.
pub(crate) fn task_id(context: &CommandContext) -> Option<u64> {
    let value = context.first_of(&["id", "0"])?;
    let id = integer_value("id", value).ok()?;
    u64::try_from(id).ok().filter(|id| *id > 0)
}

/// Argument rendered as text; `None` when absent or empty.
pub(crate) fn text(context: &CommandContext, keys: &[&str]) -> Option<String> {
    context
        .first_of(keys)
        .map(ArgValue::to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn priority_arg(context: &CommandContext, keys: &[&str]) -> Result<Option<Priority>> {
    text(context, keys)
        .map(|s| {
            s.parse::<Priority>()
                .map_err(|reason| CliError::invalid_argument("priority", reason))
        })
        .transpose()
}

pub(crate) fn status_arg(context: &CommandContext) -> Result<Option<TaskStatus>> {
    text(context, &["status", "s"])
        .map(|s| {
            s.parse::<TaskStatus>()
                .map_err(|reason| CliError::invalid_argument("status", reason))
        })
        .transpose()
}

pub(crate) fn due_arg(context: &CommandContext, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
    text(context, &["due", "d"])
        .map(|s| parse_due_date(&s, now).map_err(|reason| CliError::invalid_argument("due", reason)))
        .transpose()
}

pub(crate) fn tags_arg(context: &CommandContext) -> Option<Vec<String>> {
    context.first_of(&["tags", "t"]).map(ArgValue::to_list)
}

/// Detail lines shared by the add and update confirmations.
pub(crate) fn describe(task: &Task) -> String {
    let mut out = format!("ID: {}\n", task.id);
    out.push_str(&format!("Title: {}\n", task.title));
    out.push_str(&format!(
        "Priority: {} {}\n",
        priority_icon(task.priority),
        task.priority.label()
    ));
    out.push_str(&format!("Status: {}\n", task.status));
    if let Some(description) = &task.description {
        out.push_str(&format!("Description: {description}\n"));
    }
    if let Some(due) = task.due_date {
        out.push_str(&format!("Due: {}\n", super::format_date(due)));
    }
    if !task.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", task.tags.join(", ")));
    }
    out
}
