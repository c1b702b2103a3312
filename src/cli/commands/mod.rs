pub mod preview;
pub mod resolve;
pub mod selection;
pub mod settings;

pub use preview::{PreviewCommands, preview_command};
pub use resolve::{ResolveCommands, resolve_command};
pub use selection::{SelectionCommands, selection_command};
pub use settings::{SettingsCommands, settings_command};
