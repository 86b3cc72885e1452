//! `steamlib` command-line entry point.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = config::Config::load_from(&config_path)?;
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        steam_dir = %config.steam_dir.display(),
        "configuration loaded"
    );

    let stdout = std::io::stdout();
    commands::run(&cli, &config, &mut stdout.lock())
}
