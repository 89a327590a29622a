//! Color theme and styling for the gift TUI

use gift_core::capture::Rgba;
use ratatui::style::{Color, Modifier, Style};

/// Pink gift palette
#[derive(Debug, Clone)]
pub struct GiftTheme {
    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Accents
    pub heart: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight: Color,
    pub danger: Color,

    /// Confetti colors, cycled by index.
    pub confetti: [Color; 7],
}

impl Default for GiftTheme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(255, 240, 245),
            foreground: Color::Rgb(90, 40, 60),
            border: Color::Rgb(255, 175, 204),
            border_focused: Color::Rgb(255, 107, 157),

            heart: Color::Rgb(250, 72, 67),
            accent: Color::Rgb(255, 107, 157),
            muted: Color::Rgb(170, 130, 145),
            highlight: Color::Rgb(255, 190, 11),
            danger: Color::Rgb(220, 38, 38),

            confetti: [
                Color::Rgb(0xff, 0x6b, 0x9d),
                Color::Rgb(0xff, 0x8f, 0xab),
                Color::Rgb(0xfb, 0x6f, 0x92),
                Color::Rgb(0xff, 0x00, 0x6e),
                Color::Rgb(0x83, 0x38, 0xec),
                Color::Rgb(0x3a, 0x86, 0xff),
                Color::Rgb(0xff, 0xbe, 0x0b),
            ],
        }
    }
}

impl GiftTheme {
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn heart_style(&self) -> Style {
        Style::default().fg(self.heart)
    }

    /// Style for a selectable button
    pub fn button_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(Color::White)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.accent)
        }
    }

    /// Get border style based on focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn confetti_color(&self, index: usize) -> Color {
        self.confetti[index % self.confetti.len()]
    }
}

/// Approximate RGBA for a terminal color, used when snapshotting the screen.
pub fn color_to_rgba(color: Color, fallback: Rgba) -> Rgba {
    let rgb = match color {
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Black => [0, 0, 0],
        Color::Red => [128, 0, 0],
        Color::Green => [0, 128, 0],
        Color::Yellow => [128, 128, 0],
        Color::Blue => [0, 0, 128],
        Color::Magenta => [128, 0, 128],
        Color::Cyan => [0, 128, 128],
        Color::Gray => [192, 192, 192],
        Color::DarkGray => [128, 128, 128],
        Color::LightRed => [255, 0, 0],
        Color::LightGreen => [0, 255, 0],
        Color::LightYellow => [255, 255, 0],
        Color::LightBlue => [0, 0, 255],
        Color::LightMagenta => [255, 0, 255],
        Color::LightCyan => [0, 255, 255],
        Color::White => [255, 255, 255],
        Color::Indexed(_) | Color::Reset => return fallback,
    };
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}
