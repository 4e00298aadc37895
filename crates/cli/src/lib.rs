//! Tempo CLI - command parsing and dispatch for the Tempo productivity bot.
//!
//! A line such as `/todo add "Fix bug" --priority=high` is tokenized and
//! parsed into a [`context::CommandContext`], resolved by name
//! (`todo-add`) in the [`registry::CommandRegistry`], validated, executed and
//! returned as a [`command::CommandResponse`].
//!
//! ## Quick Overview
//!
//! - **Parsing**: [`parser`] turns a line into command, subcommand and typed arguments
//! - **Commands**: each chat command lives in `commands/` and implements [`command::Command`]
//! - **Dispatch**: [`dispatcher::Dispatcher`] owns the registry and never fails on bad input
//! - **Global Flags**: every subcommand supports `--json`, `--data-file`, `--in-memory`,
//!   `--verbose` and `--quiet` via [`common::GlobalArgs`]
//! - **Error Handling**: [`error::CliError`] for engine errors; the binary reports with miette

pub mod command;
pub mod commands;
pub mod common;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod parser;
pub mod registry;
pub mod repl;

use clap::{Args, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tempo_core::config::{Config, FocusDefaults};

use crate::common::GlobalArgs;

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive prompt (default)
    Repl,

    /// Run a single command line, e.g. `tempo run todo list --status=pending`
    Run(RunArgs),

    /// List the available chat commands
    Commands,

    /// Show or change the configuration
    Config(ConfigArgs),
}

/// Arguments for `tempo run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// The command line, leading `/` optional
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub line: Vec<String>,
}

impl RunArgs {
    /// Rebuilds the input line, quoting arguments the shell unquoted.
    pub fn command_line(&self) -> String {
        self.line
            .iter()
            .map(|arg| quote_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Wraps `arg` in quotes when it would otherwise split into several tokens.
/// Only the value of a `--key=value` or `-k=value` flag is quoted.
fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(char::is_whitespace) {
        return arg.to_string();
    }
    match arg.split_once('=') {
        Some((key, value)) if key.starts_with('-') && !key.contains(char::is_whitespace) => {
            format!("{key}=\"{value}\"")
        }
        _ => format!("\"{arg}\""),
    }
}

/// Arguments for `tempo config`.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Store tasks and sessions in this file from now on
    #[arg(long, value_name = "PATH")]
    pub set_data_file: Option<PathBuf>,

    /// Default log filter, e.g. `info` or `tempo_cli=debug`
    #[arg(long, value_name = "FILTER")]
    pub set_log_level: Option<String>,
}

/// Output of `tempo config`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOutput {
    pub path: PathBuf,
    pub data_file: PathBuf,
    pub log_level: String,
    pub focus: FocusDefaults,
}

/// Tracing filter from the flags, falling back to the configured level.
pub fn log_filter(global: &GlobalArgs) -> String {
    if global.verbose {
        return "debug".to_string();
    }
    if global.quiet {
        return "error".to_string();
    }
    Config::load()
        .map(|config| config.log_level().to_string())
        .unwrap_or_else(|_| "warn".to_string())
}

/// Runs a CLI subcommand.
///
/// # Errors
///
/// Returns an error if the configuration or data file cannot be loaded, or
/// stdin/stdout fail. A failed chat command exits with status 1.
pub async fn run(cmd: Commands, global: GlobalArgs) -> Result<()> {
    match cmd {
        Commands::Repl => {
            let dispatcher = global.open_dispatcher().await?;
            repl::run(&dispatcher, &global).await
        }
        Commands::Run(args) => {
            let dispatcher = global.open_dispatcher().await?;
            let response = dispatcher.process(&args.command_line()).await;
            global.respond(&response)?;
            if !response.success {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Commands => {
            let dispatcher = global.open_dispatcher().await?;
            if global.json {
                let infos: Vec<_> = dispatcher.registry().commands().map(|c| *c.info()).collect();
                global.print_json(&infos)
            } else {
                global.print(&dispatcher.help());
                Ok(())
            }
        }
        Commands::Config(args) => config(args, &global),
    }
}

fn config(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(path) = args.set_data_file {
        config.set_data_file(Some(path))?;
        global.success("Data file updated");
    }
    if let Some(level) = args.set_log_level {
        config.set_log_level(level)?;
        global.success("Log level updated");
    }

    let output = ConfigOutput {
        path: Config::path()?,
        data_file: config.data_file()?,
        log_level: config.log_level().to_string(),
        focus: config.focus,
    };

    if global.json {
        return global.print_json(&output);
    }

    global.heading("Configuration");
    global.kv("Path", &output.path.display().to_string());
    global.kv("Data file", &output.data_file.display().to_string());
    global.blank();
    global.print(toml::to_string_pretty(&config).into_diagnostic()?.trim_end());
    Ok(())
}
