use super::commands::preview::PreviewCommands;
use super::commands::resolve::ResolveCommands;
use super::commands::selection::SelectionCommands;
use super::commands::settings::SettingsCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pageflow")]
#[command(about = "Page-transition state machine for single-page sites, with a terminal preview")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal preview
    Preview(PreviewCommands),
    /// Show which section a URL resolves to
    Resolve(ResolveCommands),
    /// Inspect or clear the persisted selection
    Selection(SelectionCommands),
    /// Application settings management
    Settings(SettingsCommands),
}
