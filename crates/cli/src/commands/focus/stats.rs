//! Focus session statistics over a period.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tempo_core::FocusStore;

use super::format_duration;
use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::to_data;
use crate::context::CommandContext;
use crate::error::Result;

const INFO: CommandInfo = CommandInfo {
    name: "focus-stats",
    description: "View focus session statistics",
    usage: "/focus stats [--period=week]",
    examples: &[
        "/focus stats",
        "/focus stats --period=today",
        "/focus stats --period=week",
        "/focus stats --period=month",
    ],
};

const BAR_WIDTH: u32 = 20;

/// Reporting window selected with `--period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Today,
    Week,
    Month,
    All,
}

impl Period {
    /// Unknown names fall back to a week.
    fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "today" => Period::Today,
            "month" => Period::Month,
            "all" => Period::All,
            _ => Period::Week,
        }
    }

    fn days(self) -> Option<u32> {
        match self {
            Period::Today => Some(1),
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::All => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Week => "Last 7 Days",
            Period::Month => "Last 30 Days",
            Period::All => "All Time",
        }
    }
}

pub struct FocusStatsCommand {
    sessions: Arc<dyn FocusStore>,
}

impl FocusStatsCommand {
    pub fn new(sessions: Arc<dyn FocusStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Command for FocusStatsCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        let period = context
            .get("period")
            .map(|p| Period::parse(&p.to_string()))
            .unwrap_or(Period::Week);

        let stats = self.sessions.stats(period.days()).await?;
        let active = self.sessions.active().await?;

        let mut message = format!("Focus Statistics ({})\n\n", period.label());

        if let Some(active) = active {
            message.push_str(&format!(
                "Session in progress: {} min remaining\n\n",
                active.remaining_minutes(Utc::now())
            ));
        }

        if stats.total_sessions == 0 {
            message.push_str("No sessions found for this period.\nStart one with /focus start!");
            return Ok(self.success(message, Some(to_data(&stats)?)));
        }

        message.push_str("Overview\n");
        message.push_str(&format!("  Total Sessions: {}\n", stats.total_sessions));
        message.push_str(&format!(
            "  Total Focus Time: {}\n",
            format_duration(stats.total_minutes)
        ));
        message.push_str(&format!(
            "  Avg Session: {} min\n",
            stats.average_session_length
        ));
        message.push_str(&format!(
            "  Completion Rate: {}% {}\n\n",
            stats.completion_rate,
            rating(stats.completion_rate)
        ));

        message.push_str("Streaks\n");
        message.push_str(&format!("  Current Streak: {} days\n", stats.current_streak));
        message.push_str(&format!("  Longest Streak: {} days\n\n", stats.longest_streak));

        message.push_str(&format!(
            "Completion: {} {}%",
            progress_bar(stats.completion_rate),
            stats.completion_rate
        ));

        Ok(self.success(message, Some(to_data(&stats)?)))
    }
}

fn rating(rate: u32) -> &'static str {
    if rate >= 90 {
        "🌟"
    } else if rate >= 75 {
        "✅"
    } else if rate >= 50 {
        "👍"
    } else {
        "💪"
    }
}

fn progress_bar(percentage: u32) -> String {
    // Rounded to the nearest 5%.
    let filled = ((percentage.min(100) + 2) / 5).min(BAR_WIDTH);
    let empty = BAR_WIDTH - filled;
    format!(
        "{}{}",
        "█".repeat(filled as usize),
        "░".repeat(empty as usize)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_command;
    use tempo_core::Storage;

    #[test]
    fn test_period_parsing() {
        assert_eq!(Period::parse("TODAY").days(), Some(1));
        assert_eq!(Period::parse("month").days(), Some(30));
        assert_eq!(Period::parse("all").days(), None);
        assert_eq!(Period::parse("fortnight"), Period::Week);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), "░".repeat(20));
        assert_eq!(progress_bar(100), "█".repeat(20));
        assert_eq!(progress_bar(13).chars().filter(|c| *c == '█').count(), 3);
        assert_eq!(progress_bar(12).chars().filter(|c| *c == '█').count(), 2);
    }

    #[test]
    fn test_rating() {
        assert_eq!(rating(95), "🌟");
        assert_eq!(rating(80), "✅");
        assert_eq!(rating(50), "👍");
        assert_eq!(rating(10), "💪");
    }

    #[tokio::test]
    async fn test_empty_period() {
        let cmd = FocusStatsCommand::new(Arc::new(Storage::in_memory()));
        let response = cmd
            .execute(&parse_command("/focus stats --period=all").unwrap().context)
            .await
            .unwrap();
        assert!(response.success);
        assert!(response.message.starts_with("Focus Statistics (All Time)"));
        assert!(response.message.contains("No sessions found for this period."));
        assert_eq!(response.data.unwrap()["totalSessions"], 0);
    }

    #[tokio::test]
    async fn test_reports_sessions_and_active_banner() {
        let storage = Arc::new(Storage::in_memory());
        storage.start(25, 5).await.unwrap();
        storage.stop(false).await.unwrap();
        storage.start(40, 5).await.unwrap();

        let cmd = FocusStatsCommand::new(storage);
        let response = cmd
            .execute(&parse_command("/focus stats").unwrap().context)
            .await
            .unwrap();

        assert!(response.message.starts_with("Focus Statistics (Last 7 Days)"));
        assert!(response.message.contains("Session in progress: 40 min remaining"));
        assert!(response.message.contains("Total Sessions: 2"));
        assert!(response.message.contains("Current Streak: 1 days"));
    }
}
