//! Built-in palettes and user overrides

mod dracula;
mod nord;

use parallax_core::config::{ThemeColorOverrides, ThemeConfig};
use ratatui::style::Color;

use crate::theme::Theme;

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    let channel = |s: &str, scale: u8| u8::from_str_radix(s, 16).ok().map(|v| v * scale);
    match hex.len() {
        3 => Some(Color::Rgb(
            channel(&hex[0..1], 17)?,
            channel(&hex[1..2], 17)?,
            channel(&hex[2..3], 17)?,
        )),
        6 => Some(Color::Rgb(
            channel(&hex[0..2], 1)?,
            channel(&hex[2..4], 1)?,
            channel(&hex[4..6], 1)?,
        )),
        _ => None,
    }
}

pub(crate) fn gruvbox_dark() -> Theme {
    Theme {
        background: Color::Rgb(0x1d, 0x20, 0x21),
        surface: Color::Rgb(0x45, 0x40, 0x3d),
        foreground: Color::Rgb(0xd4, 0xbe, 0x98),
        muted: Color::Rgb(0x92, 0x83, 0x74),
        status_bg: Color::Rgb(0x32, 0x30, 0x2f),
        accent: Color::Rgb(0x89, 0xb4, 0x82),
        error: Color::Rgb(0xea, 0x69, 0x62),
    }
}

/// Load a theme by name from config
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "gruvbox-dark" | "gruvbox" => gruvbox_dark(),
        "nord" => nord::default(),
        "dracula" => dracula::default(),
        other => {
            tracing::warn!(
                "Unknown theme '{}', falling back to gruvbox-dark (available: {})",
                other,
                available_themes().join(", ")
            );
            gruvbox_dark()
        }
    };

    apply_overrides(base, &config.colors)
}

fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    let slots: [(&Option<String>, &mut Color); 5] = [
        (&overrides.background, &mut theme.background),
        (&overrides.foreground, &mut theme.foreground),
        (&overrides.status_bg, &mut theme.status_bg),
        (&overrides.accent, &mut theme.accent),
        (&overrides.error, &mut theme.error),
    ];

    for (hex, slot) in slots {
        if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }

    theme
}

/// Names accepted by `[ui] theme`
pub fn available_themes() -> &'static [&'static str] {
    &["gruvbox-dark", "nord", "dracula"]
}
