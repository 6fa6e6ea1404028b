mod cli;
mod collector;
mod config;
mod error;
mod fetcher;
mod parser;
mod rate_limit;
mod report;
mod types;

use clap::Parser;
use cli::Cli;
use collector::Collector;
use colored::*;
use config::Config;
use error::StatsError;
use fetcher::PepyClient;
use log::{error, info};
use rate_limit::FixedDelay;
use std::path::Path;
use types::RunSummary;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("Starting pepy stats");

    let cli = Cli::parse();
    info!("CLI arguments parsed: days={}, json={}", cli.days, cli.json);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("{}", format!("Error: {}.", e).red());
            eprintln!("Get your API key from: https://pepy.tech/");
            return Err(e.into());
        }
    };

    let summary = match collect(&cli, &config).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", format!("Error: {}.", e).red());
            return Err(e.into());
        }
    };

    println!("{}", render_output(&cli, &summary)?);

    if let Some(path) = &cli.csv {
        export_csv(&summary, path);
    }

    Ok(())
}

fn render_output(cli: &Cli, summary: &RunSummary) -> anyhow::Result<String> {
    if cli.json {
        Ok(report::render_json(summary, cli.show_versions)?)
    } else {
        let mut table = String::from("\n");
        report::render_table(summary, cli.show_versions, &mut table)?;
        Ok(table)
    }
}

/// Reports a failed export without failing the run. Returns whether the file
/// was written.
fn export_csv(summary: &RunSummary, path: &Path) -> bool {
    match report::write_csv(summary, path) {
        Ok(()) => {
            info!("Wrote CSV report to {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to write CSV report {}: {}", path.display(), e);
            eprintln!("{}", format!("Error: failed to write CSV report: {}.", e).red());
            false
        }
    }
}

/// Reads the package list and fetches stats for every entry.
async fn collect(cli: &Cli, config: &Config) -> Result<RunSummary, StatsError> {
    let packages = parser::read_packages(&cli.packages_file).await?;
    info!("Read {} packages from {}", packages.len(), cli.packages_file.display());

    if !cli.json {
        println!("{}\n", format!("Found {} packages to check", packages.len()).green());
    }

    let client = PepyClient::new(&config.base_url)?;
    let collector = Collector::new(client, FixedDelay::new(config.request_delay), cli.days, !cli.json);
    Ok(collector.collect_all(packages, &config.api_key).await)
}
