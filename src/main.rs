use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;

use cli::Cli;
use cli::app::Commands;
use pageflow::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.preview.log_file)
        .with_context(|| format!("Failed to open log file: {}", config.preview.log_file))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting pageflow");

    match cli.command {
        Commands::Preview(args) => cli::commands::preview_command(args, &config).await?,
        Commands::Resolve(args) => cli::commands::resolve_command(args, &config).await?,
        Commands::Selection(args) => cli::commands::selection_command(args, &config).await?,
        Commands::Settings(args) => cli::commands::settings_command(args, &config).await?,
    }

    Ok(())
}
