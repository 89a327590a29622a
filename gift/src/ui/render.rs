//! Render orchestration for the gift TUI

use gift_core::ItemFilter;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::screens::render_screen;
use crate::ui::widgets::{GalleryWidget, SaveMenuWidget, StatusBarWidget, ToastWidget};

/// Overlay types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    Gallery { filter: ItemFilter, selected: usize },
    SaveMenu { selected: usize },
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    render_title_bar(frame, app, layout.title_area);
    render_screen(frame, app, layout.body);

    let status = StatusBarWidget::new(app.current(), &app.theme)
        .playing(app.music_playing())
        .saved_count(app.session.saved_items().len());
    frame.render_widget(status, layout.status_bar);

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }

    if let Some(toast) = app.toast() {
        let widget = ToastWidget::new(&toast.message, &app.theme);
        let mut popup = centered_rect_fixed(widget.width(), 3, area);
        popup.y = area.y + area.height.saturating_sub(5);
        frame.render_widget(widget, popup);
    }
}

/// Title bar with the enter-transition progress
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let progress = app.session.navigator().transition_progress();
    let shown = (app.current().title().chars().count() as f32 * progress).ceil() as usize;
    let title: String = app.current().title().chars().take(shown).collect();

    let line = Line::from(vec![
        Span::styled(" 🎁 ", app.theme.heart_style()),
        Span::styled(title, app.theme.title_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
        Overlay::Gallery { filter, selected } => {
            let popup_area = centered_rect_fixed(70, 24, area);
            frame.render_widget(Clear, popup_area);
            let items = app.session.saved_items().filtered(*filter);
            let widget = GalleryWidget::new(&items, &app.theme)
                .filter(*filter)
                .selected(*selected);
            frame.render_widget(widget, popup_area);
        }
        Overlay::SaveMenu { selected } => {
            let popup_area = centered_rect_fixed(56, 10, area);
            let message = app.page_message();
            let widget = SaveMenuWidget::new(&app.theme)
                .selected(*selected)
                .message(message);
            frame.render_widget(widget, popup_area);
        }
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::UNDERLINED),
    ))
}

fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(54, 26, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            " A gift for you - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Everywhere:"),
        Line::from("  Esc       Go back"),
        Line::from("  s         Save a picture or message"),
        Line::from("  g         Saved items gallery"),
        Line::from("  p         Play / pause music"),
        Line::from("  q         Quit"),
        Line::from(""),
        section("Screens:"),
        Line::from("  ←/→ Enter Choose (home, presents)"),
        Line::from("  1-4       Open a present"),
        Line::from("  ↑/↓       Change track / select memory"),
        Line::from("  m         Sound on/off (I love you)"),
        Line::from("  Enter     Open the letter, then continue"),
        Line::from("  h Space   Send a heart (love message)"),
        Line::from("  n         Next love message"),
        Line::from("  d C x     Delete / clear / export (photo booth)"),
        Line::from(""),
        section("Gallery:"),
        Line::from("  Tab       Switch filter"),
        Line::from("  d x       Delete / export the selected item"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture_worker::CaptureWorker;
    use gift_core::{FileStorage, GiftSession, PngRasterizer, Screen, SessionConfig, SystemClock};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let config = SessionConfig::new(dir.path());
        let session = GiftSession::new(FileStorage::new(dir.path()), SystemClock, &config);
        App::new(
            session,
            CaptureWorker::spawn(Arc::new(PngRasterizer::default())),
            dir.path(),
        )
    }

    fn draw(app: &App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
    }

    #[tokio::test]
    async fn test_every_screen_renders_at_any_size() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);
        let walk = [
            Screen::AcceptConfirmation,
            Screen::Home,
            Screen::PresentSelection,
            Screen::Song,
            Screen::PresentSelection,
            Screen::PictureAnimation,
            Screen::PresentSelection,
            Screen::Letter,
            Screen::LoveMessage,
            Screen::PresentSelection,
            Screen::PhotoBooth,
        ];

        for screen in walk {
            assert!(app.navigate(screen));
            if screen == Screen::Letter {
                app.letter_enter();
            }
            if screen == Screen::LoveMessage {
                app.press_heart();
            }
            app.tick(Duration::from_millis(250));
            for (width, height) in [(120, 40), (40, 12), (4, 3)] {
                draw(&app, width, height);
            }
        }
    }

    #[tokio::test]
    async fn test_overlays_render() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);
        app.save_message();
        app.toggle_help();
        draw(&app, 80, 24);
        app.open_gallery();
        draw(&app, 80, 24);
        app.open_save_menu();
        app.show_toast("Saved!");
        draw(&app, 80, 24);
        draw(&app, 10, 5);
    }
}
