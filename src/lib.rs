pub mod config;
pub mod nav;
pub mod preview;
