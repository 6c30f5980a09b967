//! Terminal output helpers

use colored::*;
use rundeck_core::domain::Fields;
use rundeck_core::domain::execution::{Execution, ExecutionStatus};
use rundeck_core::domain::job::Job;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Colorize an execution status for display
pub fn colorize_status(status: &ExecutionStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        ExecutionStatus::Running => status_str.cyan(),
        ExecutionStatus::Succeeded => status_str.green(),
        ExecutionStatus::Failed => status_str.red(),
        ExecutionStatus::Aborted => status_str.red(),
        ExecutionStatus::Skipped => status_str.dimmed(),
        ExecutionStatus::Pending => status_str.yellow(),
        ExecutionStatus::Other(_) => status_str.normal(),
    }
}

pub fn print_job_summary(job: &Job) {
    let name = job.name.as_deref().unwrap_or("(unnamed)");
    match &job.group {
        Some(group) => println!("  {} {}/{}", "▸".cyan(), group.dimmed(), name.bold()),
        None => println!("  {} {}", "▸".cyan(), name.bold()),
    }
    println!("    ID:      {}", job.id.dimmed());
    if let Some(description) = job.description.as_deref().filter(|d| !d.is_empty()) {
        println!("    {}", description);
    }
    println!();
}

pub fn print_execution_summary(execution: &Execution) {
    println!(
        "  {} Execution {} {}",
        "▸".cyan(),
        execution.id.to_string().bold(),
        colorize_status(&execution.status)
    );
    if let Some(job) = &execution.job {
        println!("    Job:     {}", job.name.as_deref().unwrap_or(&job.id));
    } else if let Some(description) = &execution.description {
        println!("    Adhoc:   {}", description.dimmed());
    }
    if let Some(project) = &execution.project {
        println!("    Project: {}", project.dimmed());
    }
    if let Some(started) = execution.date_started {
        println!(
            "    Started: {}",
            started.format(TIME_FORMAT).to_string().dimmed()
        );
    }
    println!();
}

pub fn print_execution_details(execution: &Execution) {
    println!("{}", "Execution Details:".bold());
    println!("  ID:        {}", execution.id.to_string().cyan());
    println!("  Status:    {}", colorize_status(&execution.status));

    if let Some(project) = &execution.project {
        println!("  Project:   {}", project);
    }
    if let Some(user) = &execution.user {
        println!("  User:      {}", user);
    }
    if let Some(job) = &execution.job {
        println!(
            "  Job:       {} {}",
            job.name.as_deref().unwrap_or("(unnamed)"),
            job.id.dimmed()
        );
    }
    if let Some(description) = &execution.description {
        println!("  Command:   {}", description);
    }
    if let Some(argstring) = &execution.argstring {
        println!("  Arguments: {}", argstring);
    }
    if let Some(started) = execution.date_started {
        println!("  Started:   {}", started.format(TIME_FORMAT));

        if let Some(ended) = execution.date_ended {
            println!("  Ended:     {}", ended.format(TIME_FORMAT));
            let seconds = ended.signed_duration_since(started).num_seconds();
            println!("  Duration:  {}s", seconds);
        }
    }
    if let Some(href) = &execution.href {
        println!("  Link:      {}", href.dimmed());
    }
}

/// Print flattened fields as an indented `key: value` block
pub fn print_fields(title: &str, fields: &Fields) {
    println!("{}", title.bold());
    for (key, value) in fields {
        println!("  {:<20} {}", key.cyan(), value.as_deref().unwrap_or("-"));
    }
}

pub fn print_rule() {
    println!("{}", "─".repeat(80).dimmed());
}
