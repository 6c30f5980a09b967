//! System info command

use anyhow::{Context, Result};
use colored::*;
use rundeck_client::RundeckClient;

use crate::output::print_fields;

pub async fn show_system_info(client: &RundeckClient) -> Result<()> {
    let info = client
        .system_info()
        .await
        .context("Failed to fetch system info")?;

    println!(
        "{} {}",
        "Server time:".bold(),
        info.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    print_fields("Rundeck:", &info.rundeck);
    println!();
    print_fields("OS:", &info.os);
    println!();
    print_fields("JVM:", &info.jvm);
    println!();

    println!("{}", "Uptime:".bold());
    for (key, value) in &info.stats.uptime {
        println!("  {:<20} {}", key.cyan(), value);
    }
    println!();
    print_fields("CPU:", &info.stats.cpu);
    println!();
    print_fields("Memory:", &info.stats.memory);
    println!();
    print_fields("Scheduler:", &info.stats.scheduler);
    println!();
    print_fields("Threads:", &info.stats.threads);

    Ok(())
}
