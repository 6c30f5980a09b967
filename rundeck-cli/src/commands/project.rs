//! Project command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use rundeck_client::RundeckClient;
use rundeck_core::domain::node::Node;
use rundeck_core::dto::filter::NodeFilter;
use rundeck_core::dto::history::HistoryQuery;

use super::FormatArg;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List all projects
    List,
    /// Show a project
    Get { name: String },
    /// List the nodes of a project
    Resources {
        name: String,

        /// Node tag filter
        #[arg(long)]
        tags: Option<String>,

        /// Node name filter
        #[arg(long)]
        nodes: Option<String>,

        /// Print the raw resource document in this format
        #[arg(long, value_enum)]
        export: Option<FormatArg>,
    },
    /// Show recent history events
    History {
        name: String,

        /// Time window such as 1d or 2w
        #[arg(long)]
        recent: Option<String>,

        #[arg(long, default_value_t = 20)]
        max: u32,
    },
}

/// Handle project commands
pub async fn handle_project_command(
    command: ProjectCommands,
    client: &RundeckClient,
) -> Result<()> {
    match command {
        ProjectCommands::List => list_projects(client).await,
        ProjectCommands::Get { name } => get_project(client, &name).await,
        ProjectCommands::Resources {
            name,
            tags,
            nodes,
            export,
        } => {
            let filter = NodeFilter {
                tags,
                name: nodes,
                ..Default::default()
            };
            match export {
                Some(format) => {
                    let document = client
                        .export_project_resources(&name, format.into(), &filter)
                        .await
                        .with_context(|| format!("Failed to export resources of {}", name))?;
                    print!("{}", document);
                    Ok(())
                }
                None => list_resources(client, &name, &filter).await,
            }
        }
        ProjectCommands::History { name, recent, max } => {
            let query = HistoryQuery {
                recent_filter: recent,
                max: Some(max),
                ..Default::default()
            };
            show_history(client, &name, &query).await
        }
    }
}

async fn list_projects(client: &RundeckClient) -> Result<()> {
    let projects = client
        .list_projects()
        .await
        .context("Failed to list projects")?;

    if projects.is_empty() {
        println!("{}", "No projects found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} project(s):", projects.len()).bold());
    println!();
    for project in projects {
        match project.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => println!(
                "  {} {}  {}",
                "▸".cyan(),
                project.name.bold(),
                description.dimmed()
            ),
            None => println!("  {} {}", "▸".cyan(), project.name.bold()),
        }
    }

    Ok(())
}

async fn get_project(client: &RundeckClient, name: &str) -> Result<()> {
    let project = client
        .get_project(name)
        .await
        .with_context(|| format!("Failed to fetch project {}", name))?;

    println!("{}", "Project Details:".bold());
    println!("  Name:        {}", project.name.cyan());
    if let Some(description) = &project.description {
        println!("  Description: {}", description);
    }
    if let Some(resources) = &project.resources {
        println!("\n{}", "Resources:".bold());
        for (key, value) in resources {
            println!("  {} = {}", key.cyan(), value.as_deref().unwrap_or(""));
        }
    }

    Ok(())
}

async fn list_resources(client: &RundeckClient, project: &str, filter: &NodeFilter) -> Result<()> {
    let nodes = client
        .list_project_resources(project, filter)
        .await
        .with_context(|| format!("Failed to list resources of {}", project))?;

    if nodes.is_empty() {
        println!("{}", "No matching nodes.".yellow());
    } else {
        println!("{}", format!("Found {} node(s):", nodes.len()).bold());
        println!();
        for node in &nodes {
            print_node(node);
        }
    }

    Ok(())
}

async fn show_history(client: &RundeckClient, project: &str, query: &HistoryQuery) -> Result<()> {
    let events = client
        .project_history(project, query)
        .await
        .with_context(|| format!("Failed to fetch history of {}", project))?;

    if events.is_empty() {
        println!("{}", "No history events.".yellow());
        return Ok(());
    }

    for event in events {
        let status = event.status.as_deref().unwrap_or("-");
        let status = match status {
            "succeed" | "succeeded" => status.green(),
            "fail" | "failed" => status.red(),
            "cancel" | "aborted" => status.yellow(),
            _ => status.normal(),
        };
        println!(
            "{} [{}] {} {}",
            event.date_ended.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            status,
            event.title.as_deref().unwrap_or("(adhoc)").bold(),
            event.user.as_deref().unwrap_or("").dimmed()
        );
        if let Some(summary) = event.summary.as_deref().filter(|s| !s.is_empty()) {
            println!("    {}", summary);
        }
    }

    Ok(())
}

fn print_node(node: &Node) {
    println!("  {} {}", "▸".cyan(), node.name.bold());
    println!("    Host:  {}@{}", node.username, node.hostname);
    if let Some(os) = &node.os_name {
        println!("    OS:    {}", os.dimmed());
    }
    if let Some(tags) = node.tags.as_ref().filter(|t| !t.is_empty()) {
        let tags: Vec<_> = tags.iter().map(String::as_str).collect();
        println!("    Tags:  {}", tags.join(", ").dimmed());
    }
    println!();
}
