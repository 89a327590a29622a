//! One renderer per gift screen.

use std::time::Duration;

use gift_core::tiles::STEP_COUNT;
use gift_core::{Phase, Screen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, LineGauge, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::content::*;
use crate::scenes::Cue;
use crate::ui::layout::centered_rect_fixed;
use crate::ui::widgets::gallery::format_timestamp;
use crate::ui::widgets::MosaicWidget;

/// How long a sound cue label stays on screen.
const CUE_FLASH: Duration = Duration::from_millis(300);

pub fn render_screen(frame: &mut Frame, app: &App, area: Rect) {
    match app.current() {
        Screen::Home => render_home(frame, app, area),
        Screen::AcceptConfirmation => render_how_dare(frame, app, area),
        Screen::PresentSelection => render_presents(frame, app, area),
        Screen::Song => render_song(frame, app, area),
        Screen::PictureAnimation => render_pictures(frame, app, area),
        Screen::Letter => render_letter(frame, app, area),
        Screen::LoveMessage => render_love(frame, app, area),
        Screen::PhotoBooth => render_booth(frame, app, area),
    }
}

fn buttons<'a>(app: &App, labels: &[&'a str], selected: usize) -> Line<'a> {
    let mut spans = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("    "));
        }
        spans.push(Span::styled(
            format!("  {label}  "),
            app.theme.button_style(index == selected),
        ));
    }
    Line::from(spans)
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("🎀", app.theme.heart_style())),
        Line::from(""),
        Line::from(Span::styled(HOME_TITLE, app.theme.title_style())),
        Line::from(""),
        buttons(app, &[HOME_ACCEPT, HOME_REJECT], app.scenes.home.selected),
    ];
    let popup = centered_rect_fixed(50, lines.len() as u16, area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), popup);
}

fn render_how_dare(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from("😤"),
        Line::from(""),
        Line::from(Span::styled(HOW_DARE_TITLE, app.theme.title_style())),
        Line::from(""),
        buttons(app, &[HOW_DARE_RETRY], 0),
    ];
    let popup = centered_rect_fixed(40, lines.len() as u16, area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), popup);
}

fn render_presents(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(centered_rect_fixed(80, 12, area));

    let header = vec![
        Line::from(Span::styled(PRESENTS_TITLE, app.theme.title_style())),
        Line::from(Span::styled(PRESENTS_HINT, app.theme.muted_style())),
    ];
    frame.render_widget(Paragraph::new(header).alignment(Alignment::Center), chunks[0]);

    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);

    for (index, (_, icon, label)) in PRESENTS.iter().enumerate() {
        let selected = index == app.scenes.presents.selected;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(selected))
            .title(format!(" {} ", index + 1));
        let body = vec![
            Line::from(""),
            Line::from(*icon),
            Line::from(""),
            Line::from(Span::styled(*label, app.theme.button_style(selected))),
        ];
        frame.render_widget(
            Paragraph::new(body).alignment(Alignment::Center).block(block),
            boxes[index],
        );
    }
}

fn render_song(frame: &mut Frame, app: &App, area: Rect) {
    let song = &app.scenes.song;
    let playing = app.session.navigator().is_playing();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    let card = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    let (title, _) = TRACKS[song.track];
    let elapsed = song.position.as_secs();
    let total = song.length().as_secs();
    let player = vec![
        Line::from(Span::styled(SONG_TITLE, app.theme.title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(if playing { "⏸  " } else { "▶  " }, app.theme.heart_style()),
            Span::styled(title, app.theme.text_style().add_modifier(Modifier::BOLD)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(player).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(playing)),
        ),
        card[0],
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(app.theme.border_style(false)))
        .gauge_style(Style::default().fg(app.theme.accent))
        .label(format!(
            "{}:{:02} / {}:{:02}",
            elapsed / 60,
            elapsed % 60,
            total / 60,
            total % 60
        ))
        .ratio(song.progress());
    frame.render_widget(gauge, card[1]);

    let mut list = Vec::new();
    for (index, (name, length)) in TRACKS.iter().enumerate() {
        let marker = if index == song.track { "♫ " } else { "  " };
        list.push(Line::from(vec![
            Span::styled(marker, app.theme.heart_style()),
            Span::styled(
                format!("{name}  {}:{:02}", length / 60, length % 60),
                app.theme.button_style(index == song.track),
            ),
        ]));
    }
    frame.render_widget(
        Paragraph::new(list).block(Block::default().title(" Tracks ").borders(Borders::ALL)),
        card[2],
    );

    let note: Vec<Line> = SONG_NOTE
        .iter()
        .enumerate()
        .flat_map(|(index, paragraph)| {
            let style = if index == 0 {
                app.theme.title_style()
            } else {
                app.theme.text_style()
            };
            [Line::from(Span::styled(*paragraph, style)), Line::from("")]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(note)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(app.theme.border_style(false))),
        columns[1],
    );
}

fn render_pictures(frame: &mut Frame, app: &App, area: Rect) {
    let pictures = &app.scenes.pictures;
    let letters = pictures.letters();

    let mut word = Vec::new();
    for (index, letter) in PICTURES_WORD.iter().enumerate() {
        // A gap after "I" and after "LOVE"
        if index == 1 || index == 5 {
            word.push(Span::raw("   "));
        }
        let shown = if letters[index] { letter.to_string() } else { " ".to_string() };
        word.push(Span::styled(
            format!("{shown} "),
            app.theme.title_style(),
        ));
    }

    let cue = match pictures.last_cue {
        Some((cue, age)) if age < CUE_FLASH && pictures.sound_on => match cue {
            Cue::Blop => "blop!",
            Cue::Blup => "blup!",
        },
        _ => "",
    };
    let sound = if pictures.sound_on { "🔊 sound on (m)" } else { "🔇 sound off (m)" };

    let lines = vec![
        Line::from("💑"),
        Line::from(""),
        Line::from(word),
        Line::from(""),
        Line::from(Span::styled(cue, app.theme.heart_style())),
        Line::from(""),
        Line::from(Span::styled(sound, app.theme.muted_style())),
    ];
    let popup = centered_rect_fixed(60, lines.len() as u16, area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), popup);
}

fn render_letter(frame: &mut Frame, app: &App, area: Rect) {
    let phase = app
        .session
        .heart_wall()
        .map(|wall| wall.phase())
        .unwrap_or(Phase::Idle);

    let ratio = match phase {
        Phase::Idle => 0.0,
        Phase::Playing { placed } => placed as f64 / STEP_COUNT as f64,
        Phase::Rising { .. } | Phase::Done => 1.0,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(ratio >= 1.0));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if let Some(mosaic) = app.session.mosaic() {
        frame.render_widget(MosaicWidget::new(&mosaic, &app.theme), rows[0]);
    }

    let progress = LineGauge::default()
        .filled_style(app.theme.heart_style())
        .unfilled_style(app.theme.muted_style())
        .ratio(ratio);
    frame.render_widget(progress, rows[1]);

    match phase {
        Phase::Idle => {
            let popup = centered_rect_fixed(40, 6, rows[0]);
            frame.render_widget(Clear, popup);
            let intro = vec![
                Line::from(""),
                Line::from(Span::styled(LETTER_INTRO_TITLE, app.theme.title_style())),
                Line::from(""),
                Line::from(Span::styled(
                    LETTER_INTRO_HINT,
                    // Slow blink while waiting
                    if (app.animation_frame / 10) % 2 == 0 {
                        app.theme.muted_style()
                    } else {
                        app.theme.title_style()
                    },
                )),
            ];
            frame.render_widget(
                Paragraph::new(intro).alignment(Alignment::Center).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(app.theme.border_style(true)),
                ),
                popup,
            );
        }
        Phase::Done => {
            let bottom = Rect {
                y: rows[0].bottom().saturating_sub(3),
                height: 3.min(rows[0].height),
                ..rows[0]
            };
            let done = vec![
                Line::from(Span::styled(LETTER_DONE, app.theme.title_style())),
                Line::from(Span::styled("Press Enter to continue", app.theme.muted_style())),
            ];
            frame.render_widget(Paragraph::new(done).alignment(Alignment::Center), bottom);
        }
        Phase::Playing { .. } | Phase::Rising { .. } => {}
    }
}

fn render_love(frame: &mut Frame, app: &App, area: Rect) {
    let love = &app.scenes.love;
    if area.width == 0 || area.height == 0 {
        return;
    }

    for heart in &love.floating {
        if let Some(height) = heart.height_at(love.elapsed) {
            let x = area.x + (heart.x * area.width.saturating_sub(1) as f32) as u16;
            let y = area.bottom().saturating_sub(1)
                - (height * area.height.saturating_sub(1) as f32) as u16;
            frame.buffer_mut().set_string(x, y, "♥", app.theme.muted_style());
        }
    }

    let card = centered_rect_fixed(64, 11, area);
    frame.render_widget(Clear, card);

    let lines = vec![
        Line::from(Span::styled(LOVE_TITLE, app.theme.title_style())),
        Line::from(Span::styled(LOVE_SUBTITLE, app.theme.muted_style())),
        Line::from(""),
        Line::from(Span::styled(
            format!("♥ {}", love.hearts),
            app.theme.heart_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(love.current_message(), app.theme.text_style())),
        Line::from(""),
        Line::from(Span::styled(
            "h send a heart · n next message · s save",
            app.theme.muted_style(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(app.theme.border_style(true)),
            ),
        card,
    );

    let cx = card.x as f32 + card.width as f32 / 2.0;
    let cy = card.y as f32 + 4.0;
    for piece in &love.confetti {
        if piece.age < piece.delay {
            continue;
        }
        let x = cx + piece.dx;
        let y = cy + piece.dy;
        if x < area.x as f32 || y < area.y as f32 {
            continue;
        }
        let (x, y) = (x as u16, y as u16);
        if x < area.right() && y < area.bottom() {
            let style = Style::default().fg(app.theme.confetti_color(piece.color));
            frame.buffer_mut().set_string(x, y, "✦", style);
        }
    }
}

fn render_booth(frame: &mut Frame, app: &App, area: Rect) {
    let memories = app.session.memories().list();
    let block = Block::default()
        .title(format!(" {BOOTH_TITLE} ({}) ", memories.len()))
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let mut lines = Vec::new();
    if memories.is_empty() {
        lines.push(Line::from(Span::styled(BOOTH_EMPTY, app.theme.muted_style())));
    }
    for (index, memory) in memories.iter().enumerate() {
        let selected = index == app.scenes.booth.selected;
        lines.push(Line::from(vec![
            Span::styled(if selected { "▶ " } else { "  " }, app.theme.title_style()),
            Span::styled(memory.title.as_str(), app.theme.button_style(selected)),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "    {} · {} KB",
                format_timestamp(memory.timestamp),
                memory.data_url.len() / 1024
            ),
            app.theme.muted_style(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑/↓ select · x export · d delete · C clear all · Esc home",
        Style::default().add_modifier(Modifier::DIM),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(block),
        centered_rect_fixed(70, area.height, area),
    );
}
