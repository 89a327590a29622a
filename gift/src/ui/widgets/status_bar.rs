//! Status bar widget

use gift_core::Screen;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::ui::theme::GiftTheme;

pub struct StatusBarWidget<'a> {
    screen: Screen,
    playing: bool,
    saved_count: usize,
    theme: &'a GiftTheme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(screen: Screen, theme: &'a GiftTheme) -> Self {
        Self {
            screen,
            playing: false,
            saved_count: 0,
            theme,
        }
    }

    pub fn playing(mut self, playing: bool) -> Self {
        self.playing = playing;
        self
    }

    pub fn saved_count(mut self, count: usize) -> Self {
        self.saved_count = count;
        self
    }

    /// The saved-items badge is shown everywhere but the photo booth.
    pub fn shows_badge(&self) -> bool {
        self.screen != Screen::PhotoBooth
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.screen.title()),
                self.theme.title_style(),
            ),
            Span::raw("│ "),
            Span::styled(
                if self.playing { "♫ playing " } else { "♫ paused " },
                self.theme.muted_style(),
            ),
        ];

        if self.shows_badge() {
            spans.push(Span::raw("│ "));
            spans.push(Span::styled(
                format!("💝 {} ", self.saved_count),
                self.theme.heart_style().add_modifier(Modifier::BOLD),
            ));
        }

        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            "s save · g gallery · p play/pause · ? help",
            Style::default().add_modifier(Modifier::DIM),
        ));

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
