//! Task records and the filters/changes the task store accepts.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ]
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" | "INPROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "CANCELLED" => Ok(TaskStatus::Cancelled),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

/// Task priority, ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Lowercase spellings accepted on the command line.
    pub const NAMES: [&'static str; 3] = ["low", "medium", "high"];

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the task is past its due date and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && self.status != TaskStatus::Completed,
            None => false,
        }
    }
}

/// Fields for a new task. Status always starts as pending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl TaskChanges {
    /// True when applying these changes would modify nothing.
    pub fn is_empty(&self) -> bool {
        self == &TaskChanges::default()
    }
}

/// Listing filter. Every populated field must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// Matches tasks carrying at least one of these tags.
    pub tags: Option<Vec<String>>,
    /// Inclusive upper bound on the due date.
    pub due_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on the due date.
    pub due_after: Option<DateTime<Utc>>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if let Some(tags) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            if !tags.iter().any(|t| task.tags.contains(t)) {
                return false;
            }
        }
        if let Some(before) = self.due_before {
            if !task.due_date.is_some_and(|d| d <= before) {
                return false;
            }
        }
        if let Some(after) = self.due_after {
            if !task.due_date.is_some_and(|d| d >= after) {
                return false;
            }
        }
        true
    }
}

/// Parses a due date: `today`, `tomorrow`, `YYYY-MM-DD` (midnight UTC) or RFC 3339.
pub fn parse_due_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Ok(now),
        "tomorrow" => return Ok(now + Duration::days(1)),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| {
            format!("Invalid date format: {input}. Use YYYY-MM-DD, \"today\", or \"tomorrow\"")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: u64, status: TaskStatus, tags: &[&str]) -> Task {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            status,
            priority: Priority::Medium,
            due_date: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    #[test]
    fn test_status_parsing_accepts_aliases() {
        assert_eq!("pending".parse::<TaskStatus>(), Ok(TaskStatus::Pending));
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("InProgress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_priority_order_and_parsing() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err("Invalid priority: urgent".to_string())
        );
    }

    #[test]
    fn test_filter_tags_match_any() {
        let filter = TaskFilter {
            tags: Some(vec!["backend".into(), "urgent".into()]),
            ..Default::default()
        };
        assert!(filter.matches(&task(1, TaskStatus::Pending, &["urgent"])));
        assert!(!filter.matches(&task(2, TaskStatus::Pending, &["docs"])));
    }

    #[test]
    fn test_filter_due_bounds_exclude_undated() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let filter = TaskFilter {
            due_before: Some(now),
            ..Default::default()
        };
        let mut dated = task(1, TaskStatus::Pending, &[]);
        dated.due_date = Some(now);
        assert!(filter.matches(&dated));
        assert!(!filter.matches(&task(2, TaskStatus::Pending, &[])));
    }

    #[test]
    fn test_parse_due_date_forms() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_due_date("today", now), Ok(now));
        assert_eq!(
            parse_due_date("Tomorrow", now),
            Ok(Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap())
        );
        assert_eq!(
            parse_due_date("2024-12-31", now),
            Ok(Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap())
        );
        assert!(parse_due_date("next week", now)
            .unwrap_err()
            .starts_with("Invalid date format: next week"));
    }

    #[test]
    fn test_overdue_ignores_completed() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut t = task(1, TaskStatus::Pending, &[]);
        t.due_date = Some(now - Duration::days(1));
        assert!(t.is_overdue(now));
        t.status = TaskStatus::Completed;
        assert!(!t.is_overdue(now));
    }
}
