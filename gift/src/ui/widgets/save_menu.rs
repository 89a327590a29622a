//! Save menu widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::ui::theme::GiftTheme;

/// Entries of the save menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Picture,
    Message,
}

impl SaveChoice {
    pub const ALL: [SaveChoice; 2] = [SaveChoice::Picture, SaveChoice::Message];

    pub fn label(self) -> &'static str {
        match self {
            SaveChoice::Picture => "📷 Save picture",
            SaveChoice::Message => "💌 Save message",
        }
    }
}

pub struct SaveMenuWidget<'a> {
    selected: usize,
    /// Message offered for saving, if the screen has one.
    message: Option<&'a str>,
    theme: &'a GiftTheme,
}

impl<'a> SaveMenuWidget<'a> {
    pub fn new(theme: &'a GiftTheme) -> Self {
        Self {
            selected: 0,
            message: None,
            theme,
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for SaveMenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .title(" Save ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let mut lines = Vec::new();
        for (index, choice) in SaveChoice::ALL.iter().enumerate() {
            let enabled = *choice == SaveChoice::Picture || self.message.is_some();
            let style = if !enabled {
                self.theme.muted_style().add_modifier(Modifier::CROSSED_OUT)
            } else {
                self.theme.button_style(index == self.selected)
            };
            lines.push(Line::from(Span::styled(
                format!(" {}. {} ", index + 1, choice.label()),
                style,
            )));
        }

        if let Some(message) = self.message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("“{message}”"),
                self.theme.muted_style(),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to save · Esc to cancel",
            Style::default().add_modifier(Modifier::DIM),
        )));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
