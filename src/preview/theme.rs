use anyhow::{Result, bail};
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Mocha, // Dark
    Latte, // Light
}

impl FromStr for ThemeVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mocha" | "dark" => Ok(Self::Mocha),
            "latte" | "light" => Ok(Self::Latte),
            other => bail!("Unknown theme: {}", other),
        }
    }
}

/// Colors for the preview, from the Catppuccin palettes
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // selected icon, indicator (lavender)
    pub link: Color,        // URL line (blue)
    pub heading: Color,     // page titles (mauve)
    pub warning: Color,     // in-flight transition (yellow)
    pub success: Color,     // idle state (green)
    pub muted: Color,       // key hints (peach)
    pub text: Color,
    pub text_dim: Color,    // subtext0
    pub border: Color,      // overlay1
    pub bg_base: Color,
    pub bg_surface: Color,  // surface0
    pub bg_overlay: Color,  // surface1
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Mocha => Self::mocha(),
            ThemeVariant::Latte => Self::latte(),
        }
    }

    /// Theme named in config; unknown names fall back to the default variant
    pub fn from_name(name: &str) -> Self {
        match name.parse::<ThemeVariant>() {
            Ok(variant) => Self::new(variant),
            Err(e) => {
                log::warn!("{}, using default theme", e);
                Self::default()
            }
        }
    }

    fn mocha() -> Self {
        Self {
            accent: Color::Rgb(0xb4, 0xbe, 0xfe),
            link: Color::Rgb(0x89, 0xb4, 0xfa),
            heading: Color::Rgb(0xcb, 0xa6, 0xf7),
            warning: Color::Rgb(0xf9, 0xe2, 0xaf),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
            muted: Color::Rgb(0xfa, 0xb3, 0x87),
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            text_dim: Color::Rgb(0xa6, 0xad, 0xc8),
            border: Color::Rgb(0x7f, 0x84, 0x9c),
            bg_base: Color::Rgb(0x1e, 0x1e, 0x2e),
            bg_surface: Color::Rgb(0x31, 0x32, 0x44),
            bg_overlay: Color::Rgb(0x45, 0x47, 0x5a),
        }
    }

    fn latte() -> Self {
        Self {
            accent: Color::Rgb(0x72, 0x87, 0xfd),
            link: Color::Rgb(0x1e, 0x66, 0xf5),
            heading: Color::Rgb(0x88, 0x39, 0xef),
            warning: Color::Rgb(0xdf, 0x8e, 0x1d),
            success: Color::Rgb(0x40, 0xa0, 0x2b),
            muted: Color::Rgb(0xfe, 0x64, 0x0b),
            text: Color::Rgb(0x4c, 0x4f, 0x69),
            text_dim: Color::Rgb(0x6c, 0x6f, 0x85),
            border: Color::Rgb(0x8c, 0x8f, 0xa1),
            bg_base: Color::Rgb(0xef, 0xf1, 0xf5),
            bg_surface: Color::Rgb(0xcc, 0xd0, 0xda),
            bg_overlay: Color::Rgb(0xbc, 0xc0, 0xcc),
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg_base)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg_surface)
            .add_modifier(Modifier::BOLD)
    }

    pub fn indicator_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}
