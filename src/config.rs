use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::nav::SectionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    #[serde(default = "default_section")]
    pub default_section: SectionId,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_section_param")]
    pub section_param: String,
    #[serde(default = "default_article_param")]
    pub article_param: String,
    /// Slug opened by the preview's article shortcut
    #[serde(default = "default_demo_article")]
    pub demo_article: String,
}

/// Delays in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Matches the CSS transition on icon selection and label expansion
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_indicator_ticks_ms")]
    pub indicator_ticks_ms: Vec<u64>,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    #[serde(default = "default_orientation_delay_ms")]
    pub orientation_delay_ms: u64,
    #[serde(default = "default_menu_close_ms")]
    pub menu_close_ms: u64,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_section() -> SectionId {
    SectionId::Home
}

fn default_storage_key() -> String {
    "page-section".to_string()
}

fn default_section_param() -> String {
    "section".to_string()
}

fn default_article_param() -> String {
    "article".to_string()
}

fn default_demo_article() -> String {
    "fagram-desktop".to_string()
}

fn default_settle_ms() -> u64 {
    300
}

fn default_indicator_ticks_ms() -> Vec<u64> {
    vec![16, 50, 100, 150, 200, 250, 300]
}

fn default_resize_debounce_ms() -> u64 {
    100
}

fn default_orientation_delay_ms() -> u64 {
    200
}

fn default_menu_close_ms() -> u64 {
    200
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_theme() -> String {
    "mocha".to_string()
}

fn default_base_url() -> String {
    "https://burhanverse.eu.org/".to_string()
}

fn default_log_file() -> String {
    "pageflow.log".to_string()
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            default_section: default_section(),
            storage_key: default_storage_key(),
            section_param: default_section_param(),
            article_param: default_article_param(),
            demo_article: default_demo_article(),
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            indicator_ticks_ms: default_indicator_ticks_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            orientation_delay_ms: default_orientation_delay_ms(),
            menu_close_ms: default_menu_close_ms(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            base_url: default_base_url(),
            log_file: default_log_file(),
        }
    }
}

impl TimingSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn indicator_ticks(&self) -> Vec<Duration> {
        self.indicator_ticks_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn orientation_delay(&self) -> Duration {
        Duration::from_millis(self.orientation_delay_ms)
    }

    pub fn menu_close(&self) -> Duration {
        Duration::from_millis(self.menu_close_ms)
    }

    /// Never zero, so frame scheduling always makes progress
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("pageflow")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".pageflow")
        };

        // Ensure the directory exists
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        debug!(
            "Loaded config: default section {}, {} indicator ticks",
            config.navigation.default_section,
            config.timing.indicator_ticks_ms.len()
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }
}
