//! Dracula
//! https://draculatheme.com/

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        background: Color::Rgb(0x28, 0x2a, 0x36),
        surface: Color::Rgb(0x44, 0x47, 0x5a),
        foreground: Color::Rgb(0xf8, 0xf8, 0xf2),
        muted: Color::Rgb(0x62, 0x72, 0xa4),
        status_bg: Color::Rgb(0x21, 0x22, 0x2c),
        accent: Color::Rgb(0xbd, 0x93, 0xf9),
        error: Color::Rgb(0xff, 0x55, 0x55),
    }
}
