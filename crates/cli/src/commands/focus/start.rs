//! Start a focus session (Pomodoro timer).

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tempo_core::config::FocusDefaults;
use tempo_core::FocusStore;

use crate::command::{Command, CommandInfo, CommandResponse};
use crate::commands::{format_time, to_data};
use crate::context::{integer_value, CommandContext};
use crate::error::{CliError, Result};

/// Longest session accepted, in minutes.
pub const MAX_DURATION: i64 = 240;

const INFO: CommandInfo = CommandInfo {
    name: "focus-start",
    description: "Start a focus session (Pomodoro timer)",
    usage: "/focus start [duration] [--break=5]",
    examples: &["/focus start", "/focus start 25", "/focus start 50 --break=10"],
};

pub struct StartFocusCommand {
    sessions: Arc<dyn FocusStore>,
    defaults: FocusDefaults,
}

impl StartFocusCommand {
    pub fn new(sessions: Arc<dyn FocusStore>, defaults: FocusDefaults) -> Self {
        Self { sessions, defaults }
    }

    fn minutes(context: &CommandContext, keys: &[&str], default: u32) -> Result<u32> {
        let Some(value) = context.first_of(keys) else {
            return Ok(default);
        };
        let minutes = integer_value(keys[0], value)?;
        u32::try_from(minutes).map_err(|_| {
            CliError::invalid_argument(keys[0], format!("{} must not be negative", keys[0]))
        })
    }
}

#[async_trait]
impl Command for StartFocusCommand {
    fn info(&self) -> &CommandInfo {
        &INFO
    }

    fn validate(&self, context: &CommandContext) -> bool {
        match context.first_of(&["duration", "0"]) {
            None => true,
            Some(value) => integer_value("duration", value)
                .is_ok_and(|minutes| (1..=MAX_DURATION).contains(&minutes)),
        }
    }

    async fn execute(&self, context: &CommandContext) -> Result<CommandResponse> {
        let now = Utc::now();

        if let Some(active) = self.sessions.active().await? {
            let elapsed = active.elapsed_minutes(now);
            return Ok(self.error(
                "A focus session is already in progress",
                Some(format!(
                    "Duration: {} minutes\nElapsed: {} minutes\nRemaining: {} minutes\n\nUse /focus stop to end it first.",
                    active.duration,
                    elapsed,
                    active.remaining_minutes(now)
                )),
            ));
        }

        let duration = Self::minutes(context, &["duration", "0"], self.defaults.duration)?;
        let break_time = Self::minutes(context, &["break", "b"], self.defaults.break_time)?;

        let session = self.sessions.start(duration, break_time).await?;
        let ends_at = session.started_at + Duration::minutes(i64::from(duration));

        let message = format!(
            "Focus Session Started!\n\n\
             Duration: {duration} minutes\n\
             Break: {break_time} minutes\n\
             Started: {}\n\
             Will end at: {}\n\n\
             Use /focus stop when done.",
            format_time(session.started_at),
            format_time(ends_at),
        );
        Ok(self.success(message, Some(to_data(&session)?)))
    }
}
