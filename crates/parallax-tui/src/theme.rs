use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    /// Backdrop behind posters and cards
    pub background: Color,
    /// Placeholder card while a photo is still downloading
    pub surface: Color,
    pub foreground: Color,
    pub muted: Color,
    pub status_bg: Color,
    pub accent: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::gruvbox_dark()
    }
}

impl Theme {
    /// RGB triple of a theme color, for pixel blending
    pub fn rgb(color: Color) -> [u8; 3] {
        match color {
            Color::Rgb(r, g, b) => [r, g, b],
            Color::Black => [0, 0, 0],
            Color::White => [0xff, 0xff, 0xff],
            Color::Gray => [0x80, 0x80, 0x80],
            Color::DarkGray => [0x40, 0x40, 0x40],
            _ => [0x20, 0x20, 0x20],
        }
    }
}
