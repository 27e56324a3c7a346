use ratatui::style::Color;

use crate::model::config::UiSettings;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub today_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x10, 0x18),
            text: Color::Rgb(0xC8, 0xC8, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6A, 0x6A, 0x85),
            highlight: Color::Rgb(0x4A, 0xB0, 0xF0),
            red: Color::Rgb(0xF0, 0x50, 0x50),
            yellow: Color::Rgb(0xF0, 0xC8, 0x40),
            green: Color::Rgb(0x50, 0xD0, 0x88),
            cyan: Color::Rgb(0x40, 0xD0, 0xE0),
            blue: Color::Rgb(0x50, 0x88, 0xF0),
            selection_bg: Color::Rgb(0x28, 0x30, 0x48),
            today_bg: Color::Rgb(0x20, 0x30, 0x28),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from ui config, falling back to defaults
    pub fn from_config(ui: &UiSettings) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "dim" => theme.dim = color,
                    "highlight" => theme.highlight = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "green" => theme.green = color,
                    "cyan" => theme.cyan = color,
                    "blue" => theme.blue = color,
                    "selection_bg" => theme.selection_bg = color,
                    "today_bg" => theme.today_bg = color,
                    _ => {}
                }
            }
        }
        theme
    }
}
