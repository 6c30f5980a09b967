//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod adhoc;
mod execution;
mod job;
mod project;
mod raw;
mod system;

pub use adhoc::AdhocCommands;
pub use execution::ExecutionCommands;
pub use job::JobCommands;
pub use project::ProjectCommands;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use rundeck_client::RundeckClient;
use rundeck_core::dto::job::DocumentFormat;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show server and JVM information
    System,
    /// Project management
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Execution management
    Execution {
        #[command(subcommand)]
        command: ExecutionCommands,
    },
    /// Run ad-hoc commands on nodes
    Adhoc {
        #[command(subcommand)]
        command: AdhocCommands,
    },
    /// GET an API path and print the parsed response as JSON
    Raw {
        /// Response kind used to parse the body (e.g. jobs, executions, system_info)
        kind: String,

        /// API path relative to the versioned root (e.g. project/demo/jobs)
        path: String,

        /// Query parameter, repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, client: &RundeckClient) -> Result<()> {
    match command {
        Commands::System => system::show_system_info(client).await,
        Commands::Project { command } => project::handle_project_command(command, client).await,
        Commands::Job { command } => job::handle_job_command(command, client).await,
        Commands::Execution { command } => {
            execution::handle_execution_command(command, client).await
        }
        Commands::Adhoc { command } => adhoc::handle_adhoc_command(command, client).await,
        Commands::Raw { kind, path, params } => raw::fetch(client, &kind, &path, params).await,
    }
}

/// Document format flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Xml,
    Yaml,
}

impl From<FormatArg> for DocumentFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Xml => DocumentFormat::Xml,
            FormatArg::Yaml => DocumentFormat::Yaml,
        }
    }
}

/// Parse a `KEY=VALUE` argument
pub(crate) fn parse_key_val(input: &str) -> std::result::Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", input)),
    }
}
