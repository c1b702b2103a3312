use anyhow::{Context, Result};
use clap::Args;
use log::info;

use pageflow::config::Config;
use pageflow::nav::{History, HistoryBridge, MemoryHistory, MemoryStorage, SectionId, Storage};

#[derive(Args)]
pub struct ResolveCommands {
    /// URL to resolve, as it would appear on page load
    pub url: String,
    /// Act as if this section was persisted by a previous visit
    #[arg(long)]
    pub stored: Option<String>,
}

pub async fn resolve_command(args: ResolveCommands, config: &Config) -> Result<()> {
    info!("Resolving {}", args.url);
    url::Url::parse(&args.url).with_context(|| format!("Invalid URL: {}", args.url))?;

    let bridge = HistoryBridge::new(&config.navigation);
    let storage = MemoryStorage::new();
    if let Some(stored) = &args.stored {
        let section: SectionId = stored.parse()?;
        storage.set(bridge.storage_key(), section.as_str())?;
    }

    let history = MemoryHistory::new(args.url.clone());
    let request = bridge.resolve_initial_request(&history, &storage);

    println!("Section:    {}", request.section);
    println!("Icon group: {}", request.section.icon_group());
    if let Some(slug) = request.payload() {
        println!("Article:    {}", slug);
    }
    if history.replacements() > 0 {
        println!("Rewritten:  {}", history.location());
    }

    Ok(())
}
