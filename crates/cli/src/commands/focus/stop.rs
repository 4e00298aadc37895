//! Stop the current focus session.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tempo_core::FocusStore;

use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::to_data;
use crate::context::CommandContext;
use crate::error::Result;

const INFO: CommandInfo = CommandInfo {
    name: "focus-stop",
    description: "Stop the current focus session",
    usage: "/focus stop [--interrupted]",
    examples: &["/focus stop", "/focus stop --interrupted"],
};

pub struct StopFocusCommand {
    sessions: Arc<dyn FocusStore>,
}

impl StopFocusCommand {
    pub fn new(sessions: Arc<dyn FocusStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Command for StopFocusCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        // Presence is enough, `--interrupted=false` still counts.
        let interrupted = context.has("interrupted");

        let Some(active) = self.sessions.active().await? else {
            return Ok(self.error(
                "No active focus session found",
                Some("Use /focus start to begin one".into()),
            ));
        };

        let elapsed = active.elapsed_minutes(Utc::now());
        let completion = (u64::from(elapsed) * 100 / u64::from(active.duration.max(1))).min(100);

        let session = self.sessions.stop(interrupted).await?;

        let (status, closing) = if interrupted {
            (
                "Interrupted",
                "Tip: Try to minimize interruptions next time!".to_string(),
            )
        } else {
            (
                "Completed",
                format!("Great work! Take a {}-minute break.", session.break_time),
            )
        };
        let message = format!(
            "Focus Session {status}!\n\n\
             Planned: {} minutes\n\
             Actual: {elapsed} minutes\n\
             Completion: {completion}%\n\n\
             {closing}",
            active.duration
        );
        Ok(self.success(message, Some(to_data(&session)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_command;
    use tempo_core::Storage;

    #[tokio::test]
    async fn test_stops_active_session() {
        let storage = Arc::new(Storage::in_memory());
        storage.start(25, 5).await.unwrap();
        let cmd = StopFocusCommand::new(storage.clone());

        let response = cmd
            .execute(&parse_command("/focus stop").unwrap().context)
            .await
            .unwrap();
        assert!(response.success);
        assert!(response.message.starts_with("Focus Session Completed!"));
        assert!(response.message.contains("Planned: 25 minutes"));
        assert!(response.message.contains("Take a 5-minute break"));
        assert!(storage.active().await.unwrap().is_none());
        assert_eq!(response.data.unwrap()["interrupted"], false);
    }

    #[tokio::test]
    async fn test_interrupted_flag() {
        let storage = Arc::new(Storage::in_memory());
        storage.start(25, 5).await.unwrap();
        let cmd = StopFocusCommand::new(storage.clone());

        let response = cmd
            .execute(&parse_command("/focus stop --interrupted").unwrap().context)
            .await
            .unwrap();
        assert!(response.message.starts_with("Focus Session Interrupted!"));
        assert_eq!(response.data.unwrap()["interrupted"], true);
    }

    #[tokio::test]
    async fn test_nothing_to_stop() {
        let cmd = StopFocusCommand::new(Arc::new(Storage::in_memory()));
        let response = cmd
            .execute(&parse_command("/focus stop").unwrap().context)
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "No active focus session found");
        assert_eq!(response.error.as_deref(), Some("Use /focus start to begin one"));
    }
}
