use anyhow::Context;
use clap::{Parser, Subcommand};
use stacks_kernel::settings::Settings;

/// Command-line entrypoint for the Stacks book catalogue.
#[derive(Debug, Parser)]
#[command(name = "stacks", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Synchronise the database schema and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Stacks settings")?;
    stacks_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        command = ?cli.command,
        "stacks cli starting"
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => stacks_app::app::serve(&settings).await,
        Command::Migrate => stacks_app::app::migrate(&settings).await,
    }
}
