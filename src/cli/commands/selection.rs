use anyhow::Result;
use clap::{Args, Subcommand};
use log::info;

use pageflow::config::Config;
use pageflow::nav::{FileStorage, HistoryBridge, Storage};

#[derive(Args)]
pub struct SelectionCommands {
    #[command(subcommand)]
    pub command: SelectionSubcommands,
}

#[derive(Subcommand)]
pub enum SelectionSubcommands {
    /// Show the persisted section
    Show,
    /// Forget the persisted section
    Clear,
}

pub async fn selection_command(args: SelectionCommands, config: &Config) -> Result<()> {
    let storage = FileStorage::open_default()?;
    let bridge = HistoryBridge::new(&config.navigation);

    match args.command {
        SelectionSubcommands::Show => {
            match storage.get(bridge.storage_key())? {
                Some(raw) => {
                    println!("Stored:   {}", raw);
                    match bridge.persisted_selection(&storage) {
                        Some(section) => println!("Restores: {}", section),
                        None => println!("Restores: {} (unrecognized value)", bridge.default_section()),
                    }
                }
                None => println!("No persisted selection (loads {})", bridge.default_section()),
            }
            println!("File:     {:?}", storage.path());
        }
        SelectionSubcommands::Clear => {
            info!("Clearing persisted selection");
            storage.remove(bridge.storage_key())?;
            println!("Persisted selection cleared.");
        }
    }

    Ok(())
}
