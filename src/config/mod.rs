pub mod aws;
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "vaccine-notifier")]
#[command(about = "Publishes vaccination slot availability per district and notifies subscribers")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "district.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    pub dry_run: bool,
}
