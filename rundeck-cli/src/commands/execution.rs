//! Execution command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use rundeck_client::RundeckClient;
use rundeck_core::domain::execution::ExecutionStatus;
use rundeck_core::dto::execution::{JobExecutionsQuery, OutputOptions};

use crate::output::{
    colorize_status, print_execution_details, print_execution_summary, print_rule,
};

/// Execution subcommands
#[derive(Subcommand)]
pub enum ExecutionCommands {
    /// List running executions
    Running {
        /// Project name, or `*` for all projects
        #[arg(short, long, default_value = "*")]
        project: String,
    },
    /// List executions of a job
    List {
        job_id: String,

        /// Only executions in this status
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        max: Option<u32>,
    },
    /// Show an execution
    Status { id: u64 },
    /// Abort a running execution
    Abort {
        id: u64,

        #[arg(long)]
        as_user: Option<String>,
    },
    /// Print the log output of an execution
    Output {
        id: u64,

        /// Only the last N lines
        #[arg(long)]
        lastlines: Option<u64>,

        /// At most N lines
        #[arg(long)]
        maxlines: Option<u64>,

        /// Byte offset to start reading from
        #[arg(long)]
        offset: Option<u64>,

        /// Print the server's JSON document instead of plain text
        #[arg(long)]
        json: bool,
    },
}

/// Handle execution commands
pub async fn handle_execution_command(
    command: ExecutionCommands,
    client: &RundeckClient,
) -> Result<()> {
    match command {
        ExecutionCommands::Running { project } => list_running(client, &project).await,
        ExecutionCommands::List {
            job_id,
            status,
            max,
        } => {
            let query = JobExecutionsQuery {
                status: status.as_deref().map(ExecutionStatus::from),
                max,
                ..Default::default()
            };
            list_job_executions(client, &job_id, &query).await
        }
        ExecutionCommands::Status { id } => {
            let execution = client
                .execution_status(id)
                .await
                .with_context(|| format!("Failed to fetch execution {}", id))?;
            print_execution_details(&execution);
            Ok(())
        }
        ExecutionCommands::Abort { id, as_user } => abort(client, id, as_user.as_deref()).await,
        ExecutionCommands::Output {
            id,
            lastlines,
            maxlines,
            offset,
            json,
        } => {
            let options = OutputOptions {
                lastlines,
                maxlines,
                offset,
                ..Default::default()
            };
            show_output(client, id, &options, json).await
        }
    }
}

async fn list_running(client: &RundeckClient, project: &str) -> Result<()> {
    let executions = client
        .list_running_executions(project)
        .await
        .context("Failed to list running executions")?;

    if executions.is_empty() {
        println!("{}", "No running executions.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} running execution(s):", executions.len()).bold()
        );
        println!();
        for execution in &executions {
            print_execution_summary(execution);
        }
    }

    Ok(())
}

async fn list_job_executions(
    client: &RundeckClient,
    job_id: &str,
    query: &JobExecutionsQuery,
) -> Result<()> {
    let executions = client
        .list_job_executions(job_id, query)
        .await
        .with_context(|| format!("Failed to list executions of job {}", job_id))?;

    if executions.is_empty() {
        println!(
            "{}",
            format!("No executions found for job {}.", job_id).yellow()
        );
    } else {
        println!(
            "{}",
            format!("Found {} execution(s) of job {}:", executions.len(), job_id).bold()
        );
        println!();
        for execution in &executions {
            print_execution_summary(execution);
        }
    }

    Ok(())
}

async fn abort(client: &RundeckClient, id: u64, as_user: Option<&str>) -> Result<()> {
    let result = client
        .abort_execution(id, as_user)
        .await
        .with_context(|| format!("Failed to abort execution {}", id))?;

    let marker = if result.status == "failed" {
        "✗".red()
    } else {
        "✓".green()
    };
    println!("{} Abort {}", marker, result.status.bold());
    if let Some(status) = &result.execution_status {
        println!("  Execution {} is {}", id, colorize_status(status));
    }
    if let Some(reason) = &result.reason {
        println!("  {}", reason.dimmed());
    }

    Ok(())
}

async fn show_output(
    client: &RundeckClient,
    id: u64,
    options: &OutputOptions,
    json: bool,
) -> Result<()> {
    if json {
        let output = client
            .execution_output(id, options)
            .await
            .with_context(|| format!("Failed to fetch output of execution {}", id))?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let text = client
        .execution_output_text(id, options)
        .await
        .with_context(|| format!("Failed to fetch output of execution {}", id))?;

    if text.trim().is_empty() {
        println!("{}", "No output for this execution.".yellow());
    } else {
        println!("{}", format!("Output of execution {}:", id).bold());
        print_rule();
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
        print_rule();
    }

    Ok(())
}
