//! Rundeck CLI
//!
//! Command-line interface for a Rundeck server.

mod commands;
mod config;
mod job_ref;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, handle_command};
use config::ConnectionArgs;
use rundeck_client::RundeckClient;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rundeck")]
#[command(about = "Rundeck job scheduler CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rundeck_cli=info,rundeck_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = cli.connection.to_client_config()?;
    debug!("Connecting to {} (API v{})", config.base_url(), config.api_version);

    let client = RundeckClient::connect(config)
        .await
        .context("Failed to connect to Rundeck")?;

    handle_command(cli.command, &client).await
}
