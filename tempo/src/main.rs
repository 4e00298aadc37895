use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tempo_cli::common::GlobalArgs;
use tempo_cli::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Tasks and focus sessions from the command line")]
#[command(version)]
struct Tempo {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up miette for error reporting with fancy rendering
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .tab_width(4)
                .build(),
        )
    }))
    .into_diagnostic()?;

    let tempo = Tempo::parse();
    init_tracing(&tempo.global);

    let command = tempo.command.unwrap_or(Commands::Repl);
    tempo_cli::run(command, tempo.global).await
}

/// Logs go to stderr; `RUST_LOG` wins over the flags and the config.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tempo_cli::log_filter(global)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
