//! Terminal output and the flags shared by every subcommand.

use clap::Args;
use console::{style, Emoji, Term};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tempo_core::config::Config;
use tempo_core::Storage;
use tracing::debug;

use crate::command::CommandResponse;
use crate::dispatcher::Dispatcher;

// Emojis with fallbacks for terminals that don't support them
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "* ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static ERROR: Emoji<'_, '_> = Emoji("❌ ", "[x] ");

/// Global flags available for all subcommands.
///
/// Flattened once into the top-level parser; `global = true` lets them appear
/// after any subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Output responses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task and session file (overrides the configured one)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Keep everything in memory, nothing is written
    #[arg(long, global = true, conflicts_with = "data_file")]
    pub in_memory: bool,

    /// Detailed logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl GlobalArgs {
    fn term(&self) -> Term {
        Term::stdout()
    }

    fn term_err(&self) -> Term {
        Term::stderr()
    }

    /// Builds a dispatcher over the store selected by the flags and config.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the data file
    /// exists but cannot be read.
    pub async fn open_dispatcher(&self) -> Result<Dispatcher> {
        let config = Config::load()?;

        let storage = if self.in_memory {
            Storage::in_memory()
        } else {
            let path = match &self.data_file {
                Some(path) => path.clone(),
                None => config.data_file()?,
            };
            debug!(path = %path.display(), "Opening data file");
            Storage::open(&path).await?
        };

        let storage = Arc::new(storage);
        Ok(Dispatcher::with_defaults(
            storage.clone(),
            storage,
            config.focus,
        ))
    }

    /// Prints a command response, as JSON with `--json`.
    pub fn respond(&self, response: &CommandResponse) -> Result<()> {
        if self.json {
            return self.print_json(response);
        }
        if response.success {
            if !self.quiet {
                let _ = self.term().write_line(&render_response(response));
            }
        } else {
            let _ = self.term_err().write_line(&render_response(response));
        }
        Ok(())
    }

    /// Print a message respecting `--quiet` and `--json`.
    pub fn print(&self, message: &str) {
        if !self.quiet && !self.json {
            let _ = self.term().write_line(message);
        }
    }

    /// Print a success message with green color and icon.
    pub fn success(&self, message: &str) {
        if !self.quiet && !self.json {
            let _ =
                self.term()
                    .write_line(&format!("{}{}", SUCCESS, style(message).green().bold()));
        }
    }

    /// Print a styled heading.
    pub fn heading(&self, heading: &str) {
        if !self.quiet && !self.json {
            let _ = self.term().write_line(&format!(
                "{}{}",
                SPARKLE,
                style(heading).bold().underlined()
            ));
        }
    }

    /// Print a key-value pair.
    ///
    /// ```ignore
    /// global.kv("Data file", "/home/me/.config/tempo/tempo.json");
    /// // Outputs:   Data file: /home/me/.config/tempo/tempo.json
    /// ```
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet && !self.json {
            let _ = self.term().write_line(&format!(
                "  {}: {}",
                style(key).cyan().bold(),
                style(value).white()
            ));
        }
    }

    /// Print a blank line.
    pub fn blank(&self) {
        if !self.quiet && !self.json {
            let _ = self.term().write_line("");
        }
    }

    /// Print pretty JSON, only when `--json` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            let _ = self.term().write_line(&json);
        }
        Ok(())
    }
}

/// Human rendering of a response: status icon, message and, on failure, the
/// `Error:` section.
pub fn render_response(response: &CommandResponse) -> String {
    let mut out = if response.success {
        format!("{}{}", SUCCESS, response.message)
    } else {
        format!("{}{}", ERROR, style(&response.message).red().bold())
    };
    if !response.success {
        if let Some(error) = &response.error {
            out.push_str(&format!("\n\n{} {}", style("Error:").bold(), error));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_failure_has_error_section() {
        console::set_colors_enabled(false);
        let rendered = render_response(&CommandResponse::failure(
            "Command execution failed",
            Some("Task 9 not found".into()),
        ));
        assert!(rendered.contains("Command execution failed"));
        assert!(rendered.ends_with("\n\nError: Task 9 not found"));
    }

    #[test]
    fn test_render_success_has_no_error_section() {
        console::set_colors_enabled(false);
        let rendered = render_response(&CommandResponse::success("Done", None));
        assert!(rendered.ends_with("Done"));
        assert!(!rendered.contains("Error:"));
    }

    #[test]
    fn test_global_args_quiet_suppresses_output() {
        let args = GlobalArgs {
            quiet: true,
            ..Default::default()
        };

        // Nothing to assert on the terminal, only that it doesn't panic
        args.print("test");
        args.heading("heading");
        args.kv("key", "value");
    }
}
