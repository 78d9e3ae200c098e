//! Color themes.

use ratatui::style::Color;
use stoker_client::Rgb;

pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub highlight: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            foreground: Color::White,
            highlight: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            highlight: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

/// Map a configured bar color into a terminal color.
pub fn terminal_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}
