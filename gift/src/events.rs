//! Event handling for the gift TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use gift_core::Screen;

use crate::app::App;
use crate::content::{PRESENTS, TRACKS};
use crate::ui::widgets::SaveChoice;
use crate::ui::Overlay;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(cols, rows) => {
            app.resize(cols, rows);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Mouse wheel moves list selections
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    let delta = match mouse.kind {
        MouseEventKind::ScrollUp => -1,
        MouseEventKind::ScrollDown => 1,
        _ => return EventResult::Continue,
    };
    if matches!(app.overlay(), Some(Overlay::Gallery { .. })) {
        app.gallery_select(delta);
    } else if !app.has_overlay() && app.current() == Screen::PhotoBooth {
        app.booth_select(delta);
    } else {
        return EventResult::Continue;
    }
    EventResult::NeedsRedraw
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    // Global shortcuts
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Char('g') => {
            app.open_gallery();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Char('s') => {
            app.open_save_menu();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Char('p') => {
            app.toggle_playback();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Esc | KeyCode::Backspace => {
            app.back();
            return EventResult::NeedsRedraw;
        }
        _ => {}
    }

    match app.current() {
        Screen::Home => handle_home_key(app, key),
        Screen::AcceptConfirmation => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => navigate(app, Screen::Home),
            _ => EventResult::Continue,
        },
        Screen::PresentSelection => handle_presents_key(app, key),
        Screen::Song => handle_song_key(app, key),
        Screen::PictureAnimation => match key.code {
            KeyCode::Char('m') => {
                app.scenes.pictures.toggle_sound();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        },
        Screen::Letter => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.letter_enter();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        },
        Screen::LoveMessage => handle_love_key(app, key),
        Screen::PhotoBooth => handle_booth_key(app, key),
    }
}

fn navigate(app: &mut App, target: Screen) -> EventResult {
    app.navigate(target);
    EventResult::NeedsRedraw
}

fn handle_home_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            app.scenes.home.selected = 0;
            EventResult::NeedsRedraw
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            app.scenes.home.selected = 1;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('y') => navigate(app, Screen::PresentSelection),
        KeyCode::Char('n') => navigate(app, Screen::AcceptConfirmation),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if app.scenes.home.selected == 0 {
                navigate(app, Screen::PresentSelection)
            } else {
                navigate(app, Screen::AcceptConfirmation)
            }
        }
        _ => EventResult::Continue,
    }
}

fn handle_presents_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
            app.scenes.presents.prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            app.scenes.presents.next();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            navigate(app, PRESENTS[index].0)
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let target = app.scenes.presents.target();
            navigate(app, target)
        }
        _ => EventResult::Continue,
    }
}

fn handle_song_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            app.toggle_playback();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let song = &mut app.scenes.song;
            let track = song.track.checked_sub(1).unwrap_or(TRACKS.len() - 1);
            song.select(track);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let song = &mut app.scenes.song;
            song.select(song.track + 1);
        }
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_love_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('h') | KeyCode::Char(' ') | KeyCode::Enter => app.press_heart(),
        KeyCode::Char('n') => app.scenes.love.next_message(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_booth_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.booth_select(-1),
        KeyCode::Down | KeyCode::Char('j') => app.booth_select(1),
        KeyCode::Char('d') | KeyCode::Delete => app.booth_delete_selected(),
        KeyCode::Char('C') => app.booth_clear(),
        KeyCode::Char('x') => app.booth_export_selected(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Keys while an overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    let Some(overlay) = app.overlay().cloned() else {
        return EventResult::Continue;
    };

    match overlay {
        Overlay::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.close_overlay(),
            _ => return EventResult::Continue,
        },
        Overlay::Gallery { .. } => match key.code {
            KeyCode::Esc | KeyCode::Char('g') | KeyCode::Char('q') => app.close_overlay(),
            KeyCode::Tab => app.gallery_cycle_filter(),
            KeyCode::Up | KeyCode::Char('k') => app.gallery_select(-1),
            KeyCode::Down | KeyCode::Char('j') => app.gallery_select(1),
            KeyCode::Char('d') | KeyCode::Delete => app.gallery_delete_selected(),
            KeyCode::Char('x') => app.gallery_export_selected(),
            _ => return EventResult::Continue,
        },
        Overlay::SaveMenu { .. } => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
            KeyCode::Up | KeyCode::Char('k') => app.save_menu_select(-1),
            KeyCode::Down | KeyCode::Char('j') => app.save_menu_select(1),
            KeyCode::Char('1') => app.save_menu_confirm(Some(SaveChoice::Picture)),
            KeyCode::Char('2') => app.save_menu_confirm(Some(SaveChoice::Message)),
            KeyCode::Enter => app.save_menu_confirm(None),
            _ => return EventResult::Continue,
        },
    }
    EventResult::NeedsRedraw
}
