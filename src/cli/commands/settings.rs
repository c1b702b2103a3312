use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::info;

use pageflow::config::Config;

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings
    Show,
    /// Print the config file location
    Path,
    /// Reset all settings to default values
    Reset {
        /// Required to overwrite the existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn settings_command(args: SettingsCommands, config: &Config) -> Result<()> {
    match args.command {
        SettingsSubcommands::Show => {
            let text =
                toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
            println!("{}", text);
        }
        SettingsSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
        }
        SettingsSubcommands::Reset { force } => {
            if !force {
                println!("This overwrites {}.", Config::get_config_path()?.display());
                println!("Run again with --force to reset all settings.");
                return Ok(());
            }

            info!("Resetting all settings to defaults");
            let defaults = Config::default();
            defaults.save()?;
            println!("All settings have been reset to default values.");
        }
    }

    Ok(())
}
