//! Saved-items gallery widget

use chrono::{DateTime, Local};
use gift_core::{ItemFilter, SavedItem, SavedKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::content::{GALLERY_EMPTY, GALLERY_EMPTY_HINT};
use crate::ui::theme::GiftTheme;

/// Format an epoch-millisecond timestamp for the gallery.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// One-line preview of an item.
fn preview(item: &SavedItem, width: usize) -> String {
    match item.kind {
        SavedKind::Screenshot => format!("🖼  picture ({} KB)", item.data.len() / 1024),
        SavedKind::Message => {
            let text: String = item.data.chars().take(width.saturating_sub(4)).collect();
            if text.len() < item.data.len() {
                format!("💌 {text}…")
            } else {
                format!("💌 {text}")
            }
        }
    }
}

pub struct GalleryWidget<'a> {
    items: &'a [SavedItem],
    filter: ItemFilter,
    selected: usize,
    theme: &'a GiftTheme,
}

impl<'a> GalleryWidget<'a> {
    pub fn new(items: &'a [SavedItem], theme: &'a GiftTheme) -> Self {
        Self {
            items,
            filter: ItemFilter::All,
            selected: 0,
            theme,
        }
    }

    pub fn filter(mut self, filter: ItemFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for GalleryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" 💝 Saved items ({}) ", self.items.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut tabs = Vec::new();
        for filter in ItemFilter::ALL {
            let style = self.theme.button_style(filter == self.filter);
            tabs.push(Span::styled(format!(" {} ", filter.label()), style));
            tabs.push(Span::raw(" "));
        }

        let mut lines = vec![Line::from(tabs), Line::from("")];

        if self.items.is_empty() {
            lines.push(Line::from(Span::styled(GALLERY_EMPTY, self.theme.title_style())));
            lines.push(Line::from(Span::styled(
                GALLERY_EMPTY_HINT,
                self.theme.muted_style(),
            )));
        } else {
            // Keep the selection in view
            let rows = inner.height.saturating_sub(4) as usize / 2;
            let first = self.selected.saturating_sub(rows.saturating_sub(1));
            for (index, item) in self.items.iter().enumerate().skip(first).take(rows.max(1)) {
                let selected = index == self.selected;
                let marker = if selected { "▶ " } else { "  " };
                let style = if selected {
                    self.theme.text_style().add_modifier(Modifier::BOLD)
                } else {
                    self.theme.text_style()
                };
                lines.push(Line::from(vec![
                    Span::styled(marker, self.theme.title_style()),
                    Span::styled(preview(item, inner.width as usize), style),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {} · {}", format_timestamp(item.timestamp), item.page_id),
                    self.theme.muted_style(),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab filter · ↑/↓ select · x export · d delete · Esc close",
            Style::default().add_modifier(Modifier::DIM),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
