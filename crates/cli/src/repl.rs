//! Interactive line loop.

use console::{style, Term};
use miette::{IntoDiagnostic, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::common::GlobalArgs;
use crate::dispatcher::Dispatcher;

const PROMPT: &str = "> ";

/// What a REPL line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Exit,
    Blank,
    /// `help` or `/help [command [sub]]`
    Help(Option<String>),
    Stats,
    Command(String),
}

impl ReplInput {
    pub fn interpret(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplInput::Blank;
        }

        let bare = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let mut words = bare.split_whitespace();
        match words.next() {
            Some("exit") | Some("quit") if trimmed == bare => ReplInput::Exit,
            Some("stats") => ReplInput::Stats,
            Some("help") => {
                let topic: Vec<&str> = words.collect();
                if topic.is_empty() {
                    ReplInput::Help(None)
                } else {
                    ReplInput::Help(Some(topic.join("-")))
                }
            }
            _ => ReplInput::Command(trimmed.to_string()),
        }
    }
}

/// Reads lines from stdin until `exit`, `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run(dispatcher: &Dispatcher, global: &GlobalArgs) -> Result<()> {
    let term = Term::stdout();
    if !global.json {
        global.heading("Tempo");
        global.print(&format!(
            "Type {} for commands, {} to leave.",
            style("/help").cyan(),
            style("exit").cyan()
        ));
        global.blank();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !global.quiet && !global.json {
            let _ = term.write_str(PROMPT);
            let _ = term.flush();
        }

        let Some(line) = lines.next_line().await.into_diagnostic()? else {
            break;
        };

        match ReplInput::interpret(&line) {
            ReplInput::Exit => break,
            ReplInput::Blank => continue,
            ReplInput::Help(None) => global.print(&dispatcher.help()),
            ReplInput::Help(Some(name)) => global.print(&dispatcher.command_help(&name)),
            ReplInput::Stats => {
                let stats = dispatcher.stats().await?;
                if global.json {
                    global.print_json(&stats)?;
                } else {
                    global.kv("Commands", &stats.total_commands.to_string());
                    for (status, count) in &stats.task_counts {
                        global.kv(status.label(), &count.to_string());
                    }
                }
            }
            ReplInput::Command(input) => {
                debug!(input = %input, "Processing line");
                let response = dispatcher.process(&input).await;
                global.respond(&response)?;
            }
        }
    }

    global.print("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_control_words() {
        assert_eq!(ReplInput::interpret("  "), ReplInput::Blank);
        assert_eq!(ReplInput::interpret("exit"), ReplInput::Exit);
        assert_eq!(ReplInput::interpret("quit "), ReplInput::Exit);
        assert_eq!(ReplInput::interpret("stats"), ReplInput::Stats);
    }

    #[test]
    fn test_interpret_help_topics() {
        assert_eq!(ReplInput::interpret("help"), ReplInput::Help(None));
        assert_eq!(ReplInput::interpret("/help"), ReplInput::Help(None));
        assert_eq!(
            ReplInput::interpret("/help todo add"),
            ReplInput::Help(Some("todo-add".into()))
        );
    }

    #[test]
    fn test_interpret_commands_pass_through() {
        assert_eq!(
            ReplInput::interpret("/todo list --status=pending"),
            ReplInput::Command("/todo list --status=pending".into())
        );
        // Slash-prefixed exit is an ordinary (unknown) command
        assert_eq!(
            ReplInput::interpret("/exit"),
            ReplInput::Command("/exit".into())
        );
    }
}
