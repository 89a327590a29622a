//! Toast notice widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::ui::theme::GiftTheme;

pub struct ToastWidget<'a> {
    message: &'a str,
    theme: &'a GiftTheme,
}

impl<'a> ToastWidget<'a> {
    pub fn new(message: &'a str, theme: &'a GiftTheme) -> Self {
        Self { message, theme }
    }

    /// Width needed to show the message on one line.
    pub fn width(&self) -> u16 {
        self.message.chars().count() as u16 + 6
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));
        Paragraph::new(self.message)
            .style(self.theme.title_style())
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
