//! Ad-hoc run command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use rundeck_client::RundeckClient;
use rundeck_core::dto::adhoc::AdhocOptions;
use rundeck_core::dto::filter::NodeFilter;

/// Ad-hoc subcommands
#[derive(Subcommand)]
pub enum AdhocCommands {
    /// Run a shell command
    Command {
        #[command(flatten)]
        target: TargetArgs,

        /// Command line to run
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// Upload and run a local script
    Script {
        #[command(flatten)]
        target: TargetArgs,

        script: PathBuf,

        /// Arguments passed to the script
        #[arg(long)]
        args: Option<String>,
    },
    /// Run a script fetched by the server from a URL
    Url {
        #[command(flatten)]
        target: TargetArgs,

        url: String,

        /// Arguments passed to the script
        #[arg(long)]
        args: Option<String>,
    },
}

/// Where and how an ad-hoc run executes
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    #[arg(short, long)]
    project: String,

    /// Node name filter
    #[arg(long)]
    nodes: Option<String>,

    /// Node tag filter
    #[arg(long)]
    tags: Option<String>,

    /// Number of nodes to run on in parallel
    #[arg(long)]
    threads: Option<u32>,

    /// Continue on remaining nodes after a failure
    #[arg(long)]
    keep_going: bool,

    #[arg(long)]
    as_user: Option<String>,
}

impl TargetArgs {
    fn options(&self, args: Option<String>) -> AdhocOptions {
        AdhocOptions {
            arg_string: args.map(Into::into),
            node_threadcount: self.threads,
            node_keepgoing: self.keep_going.then_some(true),
            as_user: self.as_user.clone(),
            node_filter: NodeFilter {
                name: self.nodes.clone(),
                tags: self.tags.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Handle ad-hoc commands
pub async fn handle_adhoc_command(command: AdhocCommands, client: &RundeckClient) -> Result<()> {
    let (project, execution_id) = match command {
        AdhocCommands::Command { target, command } => {
            let command = command.join(" ");
            let id = client
                .run_adhoc_command(&target.project, &command, &target.options(None))
                .await
                .with_context(|| format!("Failed to run '{}'", command))?;
            (target.project, id)
        }
        AdhocCommands::Script {
            target,
            script,
            args,
        } => {
            let content = tokio::fs::read_to_string(&script)
                .await
                .with_context(|| format!("Failed to read {}", script.display()))?;
            let id = client
                .run_adhoc_script(&target.project, &content, &target.options(args))
                .await
                .with_context(|| format!("Failed to run script {}", script.display()))?;
            (target.project, id)
        }
        AdhocCommands::Url { target, url, args } => {
            let id = client
                .run_adhoc_url(&target.project, &url, &target.options(args))
                .await
                .with_context(|| format!("Failed to run script from {}", url))?;
            (target.project, id)
        }
    };

    println!(
        "{} Started execution {} in project {}",
        "✓".green(),
        execution_id.to_string().bold(),
        project.cyan()
    );
    println!(
        "  {}",
        format!("rundeck execution status {}", execution_id).dimmed()
    );

    Ok(())
}
