//! Job command handlers
//!
//! Handles listing, running, exporting, importing and deleting jobs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use colored::*;
use rundeck_client::{RundeckClient, WaitOptions};
use rundeck_core::domain::execution::{Execution, ExecutionStatus};
use rundeck_core::domain::results::ImportStatus;
use rundeck_core::dto::job::{ArgString, DupeOption, ImportOptions, JobQuery, RunJobOptions, UuidOption};

use super::{FormatArg, parse_key_val};
use crate::job_ref::{JobRef, resolve_job_id};
use crate::output::{colorize_status, print_execution_details, print_job_summary};

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List jobs in a project
    List {
        #[arg(short, long)]
        project: String,

        /// Group path prefix
        #[arg(long)]
        group: Option<String>,

        /// Substring match on the job name
        #[arg(long)]
        filter: Option<String>,
    },
    /// Run a job
    Run {
        /// Job ID or group/name
        job: String,

        /// Project used to look up the job by name
        #[arg(short, long)]
        project: Option<String>,

        /// Raw argument string, e.g. "-env prod -force true"
        #[arg(long, conflicts_with = "option")]
        argstring: Option<String>,

        /// Job option, repeatable
        #[arg(short, long, value_name = "NAME=VALUE", value_parser = parse_key_val)]
        option: Vec<(String, String)>,

        /// Run as another user
        #[arg(long)]
        as_user: Option<String>,

        /// Wait for the execution to finish
        #[arg(short, long)]
        wait: bool,

        /// Seconds to wait before giving up
        #[arg(long, default_value_t = 60, requires = "wait")]
        timeout: u64,

        /// Seconds between status checks
        #[arg(long, default_value_t = 3, requires = "wait")]
        interval: u64,

        /// Also stop waiting when the execution is skipped
        #[arg(long, requires = "wait")]
        stop_on_skipped: bool,
    },
    /// Export job definitions
    Export {
        /// Export a single job (ID or group/name) instead of the whole project
        #[arg(long)]
        job: Option<String>,

        #[arg(short, long)]
        project: String,

        #[arg(long, value_enum, default_value = "xml")]
        format: FormatArg,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import job definitions from an .xml or .yaml file
    Import {
        file: PathBuf,

        /// Import every definition into this project
        #[arg(short, long)]
        project: Option<String>,

        /// What to do with jobs that already exist
        #[arg(long, value_enum)]
        dupe: Option<DupeArg>,

        /// Assign new UUIDs to imported jobs
        #[arg(long)]
        remove_uuids: bool,
    },
    /// Delete jobs by ID
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DupeArg {
    Skip,
    Create,
    Update,
}

impl From<DupeArg> for DupeOption {
    fn from(dupe: DupeArg) -> Self {
        match dupe {
            DupeArg::Skip => DupeOption::Skip,
            DupeArg::Create => DupeOption::Create,
            DupeArg::Update => DupeOption::Update,
        }
    }
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, client: &RundeckClient) -> Result<()> {
    match command {
        JobCommands::List {
            project,
            group,
            filter,
        } => {
            let query = JobQuery {
                group_path: group,
                job_filter: filter,
                ..Default::default()
            };
            list_jobs(client, &project, &query).await
        }
        JobCommands::Run {
            job,
            project,
            argstring,
            option,
            as_user,
            wait,
            timeout,
            interval,
            stop_on_skipped,
        } => {
            let arg_string = match (argstring, option.is_empty()) {
                (Some(raw), _) => Some(ArgString::Raw(raw)),
                (None, false) => Some(option.into_iter().collect()),
                (None, true) => None,
            };
            let options = RunJobOptions {
                arg_string,
                as_user,
                ..Default::default()
            };
            let job = JobRef::parse(&job);
            let job_id = resolve_job_id(client, project.as_deref(), &job).await?;

            if wait {
                let mut wait = WaitOptions::new(
                    Duration::from_secs(timeout),
                    Duration::from_secs(interval),
                );
                if stop_on_skipped {
                    let mut statuses = ExecutionStatus::terminal();
                    statuses.push(ExecutionStatus::Skipped);
                    wait = wait.with_terminal_statuses(statuses);
                }
                run_job_and_wait(client, &job_id, &options, &wait).await
            } else {
                run_job(client, &job_id, &options).await
            }
        }
        JobCommands::Export {
            job,
            project,
            format,
            output,
        } => export_jobs(client, &project, job.as_deref(), format, output).await,
        JobCommands::Import {
            file,
            project,
            dupe,
            remove_uuids,
        } => {
            let options = ImportOptions {
                project,
                dupe_option: dupe.map(Into::into),
                uuid_option: remove_uuids.then_some(UuidOption::Remove),
                ..Default::default()
            };
            import_jobs(client, &file, &options).await
        }
        JobCommands::Delete { ids } => delete_jobs(client, &ids).await,
    }
}

async fn list_jobs(client: &RundeckClient, project: &str, query: &JobQuery) -> Result<()> {
    let jobs = client
        .list_jobs(project, query)
        .await
        .with_context(|| format!("Failed to list jobs in project {}", project))?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(&job);
        }
    }

    Ok(())
}

async fn run_job(client: &RundeckClient, job_id: &str, options: &RunJobOptions) -> Result<()> {
    let execution = client
        .run_job(job_id, options)
        .await
        .with_context(|| format!("Failed to run job {}", job_id))?;

    println!(
        "{} Started execution {} ({})",
        "✓".green(),
        execution.id.to_string().bold(),
        colorize_status(&execution.status)
    );
    if let Some(href) = &execution.href {
        println!("  {}", href.dimmed());
    }

    Ok(())
}

async fn run_job_and_wait(
    client: &RundeckClient,
    job_id: &str,
    options: &RunJobOptions,
    wait: &WaitOptions,
) -> Result<()> {
    println!(
        "{} Running job {} (waiting up to {}s)...",
        "▸".cyan(),
        job_id.bold(),
        wait.timeout.as_secs()
    );

    let execution = client
        .run_job_blocking(job_id, options, wait)
        .await
        .with_context(|| format!("Failed to run job {}", job_id))?;

    println!();
    print_execution_details(&execution);

    check_outcome(&execution, wait)
}

/// Turn the execution a wait ended on into the command's result
fn check_outcome(execution: &Execution, wait: &WaitOptions) -> Result<()> {
    match &execution.status {
        ExecutionStatus::Succeeded => Ok(()),
        status if status.is_terminal() || wait.terminal_statuses.contains(status) => {
            bail!("Execution {} finished as {}", execution.id, status)
        }
        status => bail!(
            "Execution {} still {} after {}s",
            execution.id,
            status,
            wait.timeout.as_secs()
        ),
    }
}

async fn export_jobs(
    client: &RundeckClient,
    project: &str,
    job: Option<&str>,
    format: FormatArg,
    output: Option<PathBuf>,
) -> Result<()> {
    let document = match job {
        Some(job) => {
            let job_id = resolve_job_id(client, Some(project), &JobRef::parse(job)).await?;
            client.export_job(&job_id, format.into()).await
        }
        None => {
            client
                .export_jobs(project, format.into(), &JobQuery::default())
                .await
        }
    }
    .with_context(|| format!("Failed to export jobs from project {}", project))?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, document)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Exported to {}", "✓".green(), path.display());
        }
        None => print!("{}", document),
    }

    Ok(())
}

async fn import_jobs(
    client: &RundeckClient,
    file: &Path,
    options: &ImportOptions,
) -> Result<()> {
    let status = client
        .import_job_file(file, options)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;

    print_import_status(&status);

    if !status.failed.is_empty() {
        bail!("{} job(s) failed to import", status.failed.len());
    }
    Ok(())
}

async fn delete_jobs(client: &RundeckClient, ids: &[String]) -> Result<()> {
    if let [id] = ids {
        let deleted = client
            .delete_job(id)
            .await
            .with_context(|| format!("Failed to delete job {}", id))?;
        if !deleted {
            bail!("Server did not confirm deletion of job {}", id);
        }
        println!("{} Deleted job {}", "✓".green(), id.bold());
        return Ok(());
    }

    let result = client
        .delete_jobs(ids)
        .await
        .context("Failed to delete jobs")?;

    if let Some(succeeded) = &result.succeeded {
        println!("{} Deleted {} job(s)", "✓".green(), succeeded.count);
    }
    if let Some(failed) = &result.failed {
        println!("{} {} job(s) not deleted:", "✗".red(), failed.count);
        for job in &failed.jobs {
            let id = job.get("id").cloned().flatten().unwrap_or_default();
            let error = job.get("error").cloned().flatten().unwrap_or_default();
            println!("  {} {}", id.dimmed(), error.red());
        }
    }

    if !result.all_successful {
        bail!("Not all of {} job(s) were deleted", result.request_count);
    }
    Ok(())
}

fn print_import_status(status: &ImportStatus) {
    let sections = [
        ("Succeeded", &status.succeeded, "✓".green()),
        ("Failed", &status.failed, "✗".red()),
        ("Skipped", &status.skipped, "-".dimmed()),
    ];

    for (label, jobs, marker) in sections {
        println!("{} {}: {}", marker, label.bold(), jobs.len());
        for job in jobs {
            let name = job.get("name").cloned().flatten().unwrap_or_default();
            let id = job.get("id").cloned().flatten().unwrap_or_default();
            println!("    {} {}", name, id.dimmed());
            if let Some(Some(error)) = job.get("error") {
                println!("      {}", error.red());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execution(status: ExecutionStatus) -> Execution {
        Execution {
            id: 42,
            href: None,
            status,
            project: None,
            user: None,
            date_started: None,
            date_ended: None,
            job: None,
            description: None,
            argstring: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_check_outcome_succeeded() {
        let wait = WaitOptions::default();
        assert!(check_outcome(&execution(ExecutionStatus::Succeeded), &wait).is_ok());
    }

    #[test]
    fn test_check_outcome_terminal_failure() {
        let wait = WaitOptions::default();
        let err = check_outcome(&execution(ExecutionStatus::Failed), &wait).unwrap_err();
        assert_eq!(err.to_string(), "Execution 42 finished as failed");
    }

    #[test]
    fn test_check_outcome_still_running() {
        let wait = WaitOptions::new(Duration::from_secs(5), Duration::from_secs(1));
        let err = check_outcome(&execution(ExecutionStatus::Running), &wait).unwrap_err();
        assert_eq!(err.to_string(), "Execution 42 still running after 5s");
    }

    #[test]
    fn test_check_outcome_skipped_when_waited_on() {
        let wait = WaitOptions::default();
        let err = check_outcome(&execution(ExecutionStatus::Skipped), &wait).unwrap_err();
        assert!(err.to_string().contains("still skipped"));

        let mut statuses = ExecutionStatus::terminal();
        statuses.push(ExecutionStatus::Skipped);
        let wait = wait.with_terminal_statuses(statuses);
        let err = check_outcome(&execution(ExecutionStatus::Skipped), &wait).unwrap_err();
        assert!(err.to_string().contains("finished as skipped"));
    }
}
