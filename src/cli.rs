use clap::Parser;
use std::path::PathBuf;

/// Fetch and display PyPI package download statistics using the pepy.tech API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to file containing package names (one per line)
    pub packages_file: PathBuf,

    /// Show available versions for each package
    #[arg(short = 'v', long)]
    pub show_versions: bool,

    /// Number of recent days to show download stats for
    #[arg(short, long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,

    /// Output results as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Also write a per-package CSV report to this path
    #[arg(long, default_value = None)]
    pub csv: Option<PathBuf>,
}
