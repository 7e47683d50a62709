use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshelf_db::{redact_uri, Database};
use bookshelf_kernel::settings::{Settings, StoreBackend};

/// Operator entrypoint for the bookshelf catalog service.
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Run the HTTP API (the default)
    Serve,
    /// Print the resolved settings as JSON, credentials redacted
    Settings,
    /// Verify the document store answers a ping
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookshelf_telemetry::init(&settings.telemetry);
            bookshelf_app::run(settings).await
        }
        Command::Settings => print_settings(settings),
        Command::Check => {
            bookshelf_telemetry::init(&settings.telemetry);
            check_store(&settings).await
        }
    }
}

fn print_settings(mut settings: Settings) -> anyhow::Result<()> {
    settings.database.uri = redact_uri(&settings.database.uri);
    let rendered =
        serde_json::to_string_pretty(&settings).context("failed to render settings")?;
    println!("{rendered}");
    Ok(())
}

async fn check_store(settings: &Settings) -> anyhow::Result<()> {
    match settings.database.backend {
        StoreBackend::Memory => {
            tracing::info!("memory backend configured; nothing to check");
        }
        StoreBackend::Mongodb => {
            let database = Database::connect(&settings.database).await?;
            let result = database.ping().await;
            database.shutdown().await;
            result?;
            tracing::info!(
                uri = %redact_uri(&settings.database.uri),
                "document store is reachable"
            );
        }
    }
    Ok(())
}
