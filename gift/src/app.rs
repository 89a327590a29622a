//! Main application state and logic

use std::path::PathBuf;
use std::time::Duration;

use gift_core::capture::{export_file_name, export_png, saved_file_name};
use gift_core::{
    FileStorage, GiftSession, ItemFilter, Phase, SavedItem, SavedKind, Screen, SessionError,
    Snapshot, SystemClock, Viewport,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::capture_worker::{CaptureDone, CaptureJob, CaptureTarget, CaptureWorker};
use crate::content::{
    LETTER_DONE, SONG_NOTE, TOAST_MEMORY_SAVED, TOAST_MESSAGE_SAVED, TOAST_PICTURE_SAVED,
    TOAST_SAVE_FAILED,
};
use crate::effects;
use crate::scenes::Scenes;
use crate::ui::theme::GiftTheme;
use crate::ui::widgets::SaveChoice;
use crate::ui::Overlay;

/// How long a toast stays up.
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

/// Pixel size of a terminal cell, used to size the heart wall.
const CELL_PX: (u32, u32) = (8, 16);

/// A short-lived notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub remaining: Duration,
}

/// Main application state
pub struct App {
    pub session: GiftSession<FileStorage, SystemClock>,

    // Capture worker and where pictures are exported
    capture: CaptureWorker,
    export_dir: PathBuf,

    // UI state
    pub theme: GiftTheme,
    overlay: Option<Overlay>,
    toast: Option<Toast>,
    pub scenes: Scenes,
    rng: StdRng,

    /// Screen to snapshot after the next draw.
    pending_screenshot: Option<Screen>,

    pub animation_frame: u8,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        session: GiftSession<FileStorage, SystemClock>,
        capture: CaptureWorker,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut rng = StdRng::from_entropy();
        let mut scenes = Scenes::default();
        scenes.mount(session.current(), &mut rng);

        Self {
            session,
            capture,
            export_dir: export_dir.into(),
            theme: GiftTheme::default(),
            overlay: None,
            toast: None,
            scenes,
            rng,
            pending_screenshot: None,
            animation_frame: 0,
            should_quit: false,
        }
    }

    pub fn current(&self) -> Screen {
        self.session.current()
    }

    /// Music for the status bar: the song's playback flag on the song screen,
    /// the heart wall's own track on the letter screen.
    pub fn music_playing(&self) -> bool {
        match self.current() {
            Screen::Song => self.session.navigator().is_playing(),
            Screen::Letter => self
                .session
                .heart_wall()
                .is_some_and(|wall| wall.audio_playing()),
            _ => false,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Go to `target`, resetting its local state. Rejected targets leave the
    /// current screen in place.
    pub fn navigate(&mut self, target: Screen) -> bool {
        match self.session.navigate(target) {
            Ok(transition) => {
                tracing::info!(from = %transition.from, to = %transition.to, "navigated");
                self.scenes.mount(target, &mut self.rng);
                self.overlay = None;
                true
            }
            Err(e) => {
                tracing::warn!("navigation rejected: {e}");
                false
            }
        }
    }

    /// Follow the current screen's back target.
    pub fn back(&mut self) -> bool {
        match self.current().back_target() {
            Some(target) => self.navigate(target),
            None => false,
        }
    }

    pub fn toggle_playback(&mut self) -> bool {
        self.session.navigator_mut().toggle_playback()
    }

    /// Resize the heart wall to a terminal of `cols` by `rows` cells.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.session.resize(Viewport::new(
            cols as u32 * CELL_PX.0,
            rows as u32 * CELL_PX.1,
        ));
    }

    // =========================================================================
    // Screen actions
    // =========================================================================

    /// Dismiss the letter intro, or continue once the wall is finished.
    pub fn letter_enter(&mut self) {
        let phase = self.session.heart_wall().map(|wall| wall.phase());
        match phase {
            Some(Phase::Idle) => match self.session.start_letter() {
                Ok(Some(event)) => effects::process_sequencer_event(&event),
                Ok(None) => {}
                Err(e) => tracing::warn!("could not start the letter: {e}"),
            },
            Some(Phase::Done) => {
                self.navigate(Screen::LoveMessage);
            }
            _ => {}
        }
    }

    pub fn press_heart(&mut self) {
        let colors = self.theme.confetti.len();
        self.scenes.love.press_heart(&mut self.rng, colors);
    }

    /// The message the current screen offers for saving.
    pub fn page_message(&self) -> Option<&'static str> {
        match self.current() {
            Screen::LoveMessage => Some(self.scenes.love.current_message()),
            Screen::Song => Some(SONG_NOTE[0]),
            Screen::Letter => {
                let done = self.session.heart_wall().map(|wall| wall.phase()) == Some(Phase::Done);
                done.then_some(LETTER_DONE)
            }
            _ => None,
        }
    }

    pub fn save_message(&mut self) {
        let Some(text) = self.page_message() else {
            return;
        };
        let page = self.current();
        let result = self.session.save_message(page, text);
        self.report_save(result.map(|_| ()), TOAST_MESSAGE_SAVED);
    }

    /// Ask for a screenshot of the current screen once it is drawn without
    /// overlays.
    pub fn request_screenshot(&mut self) {
        self.overlay = None;
        self.pending_screenshot = Some(self.current());
    }

    pub fn take_pending_screenshot(&mut self) -> Option<Screen> {
        self.pending_screenshot.take()
    }

    pub fn submit_capture(&mut self, target: CaptureTarget, snapshot: Snapshot) {
        if !self.capture.submit(CaptureJob { target, snapshot }) {
            if let CaptureTarget::Screenshot { .. } = target {
                self.show_toast(TOAST_SAVE_FAILED);
            }
        }
    }

    /// Apply every finished capture.
    pub fn drain_captures(&mut self) {
        while let Some(done) = self.capture.try_recv() {
            self.apply_capture(done);
        }
    }

    fn apply_capture(&mut self, done: CaptureDone) {
        let data_url = match done.result {
            Ok(data_url) => data_url,
            Err(e) => {
                tracing::error!(capture = ?done.target, "capture failed: {e}");
                if let CaptureTarget::Screenshot { .. } = done.target {
                    self.show_toast(TOAST_SAVE_FAILED);
                }
                return;
            }
        };

        match done.target {
            CaptureTarget::Memory { page, title } => {
                match self.session.record_memory(page, data_url, title) {
                    Ok(memory) => {
                        tracing::info!(id = %memory.id, "photo memory recorded");
                        self.show_toast(TOAST_MEMORY_SAVED);
                    }
                    Err(e) => tracing::error!("could not record memory: {e}"),
                }
            }
            CaptureTarget::Screenshot { page } => {
                let result = self
                    .session
                    .save_screenshot(page, data_url)
                    .and_then(|item| {
                        let name = export_file_name(page.id(), item.timestamp);
                        Ok(export_png(&self.export_dir, &name, &item.data)?)
                    });
                self.report_save(result.map(|_| ()), TOAST_PICTURE_SAVED);
            }
        }
    }

    fn report_save(&mut self, result: Result<(), SessionError>, success: &str) {
        match result {
            Ok(()) => self.show_toast(success),
            Err(e) => {
                tracing::error!("save failed: {e}");
                self.show_toast(TOAST_SAVE_FAILED);
            }
        }
    }

    // =========================================================================
    // Photo booth
    // =========================================================================

    pub fn booth_select(&mut self, delta: isize) {
        let len = self.session.memories().len();
        self.scenes.booth.selected = step_selection(self.scenes.booth.selected, delta, len);
    }

    pub fn booth_delete_selected(&mut self) {
        let memories = self.session.memories().list();
        if let Some(memory) = memories.get(self.scenes.booth.selected) {
            self.session.memories_mut().delete(&memory.id);
            let len = self.session.memories().len();
            self.scenes.booth.selected = self.scenes.booth.selected.min(len.saturating_sub(1));
        }
    }

    pub fn booth_clear(&mut self) {
        self.session.memories_mut().clear();
        self.scenes.booth.selected = 0;
    }

    pub fn booth_export_selected(&mut self) {
        let memories = self.session.memories().list();
        if let Some(memory) = memories.get(self.scenes.booth.selected) {
            let name = export_file_name(memory.page_id.id(), memory.timestamp);
            let result = export_png(&self.export_dir, &name, &memory.data_url);
            self.report_save(result.map(|_| ()).map_err(SessionError::from), TOAST_PICTURE_SAVED);
        }
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    /// Open the saved-items gallery. Not offered on the photo booth.
    pub fn open_gallery(&mut self) -> bool {
        if self.current() == Screen::PhotoBooth {
            return false;
        }
        self.overlay = Some(Overlay::Gallery {
            filter: ItemFilter::All,
            selected: 0,
        });
        true
    }

    pub fn open_save_menu(&mut self) {
        self.overlay = Some(Overlay::SaveMenu { selected: 0 });
    }

    /// Items shown by the open gallery.
    pub fn gallery_items(&self) -> Vec<SavedItem> {
        match self.overlay {
            Some(Overlay::Gallery { filter, .. }) => self.session.saved_items().filtered(filter),
            _ => Vec::new(),
        }
    }

    pub fn gallery_cycle_filter(&mut self) {
        if let Some(Overlay::Gallery { filter, selected }) = self.overlay.as_mut() {
            *filter = filter.next();
            *selected = 0;
        }
    }

    pub fn gallery_select(&mut self, delta: isize) {
        let len = self.gallery_items().len();
        if let Some(Overlay::Gallery { selected, .. }) = self.overlay.as_mut() {
            *selected = step_selection(*selected, delta, len);
        }
    }

    fn gallery_selected_item(&self) -> Option<SavedItem> {
        let Some(Overlay::Gallery { selected, .. }) = self.overlay else {
            return None;
        };
        self.gallery_items().into_iter().nth(selected)
    }

    pub fn gallery_delete_selected(&mut self) {
        if let Some(item) = self.gallery_selected_item() {
            self.session.saved_items_mut().delete(&item.id);
            let len = self.gallery_items().len();
            if let Some(Overlay::Gallery { selected, .. }) = self.overlay.as_mut() {
                *selected = (*selected).min(len.saturating_sub(1));
            }
        }
    }

    /// Export the selected picture as `saved-<timestamp>.png`.
    pub fn gallery_export_selected(&mut self) {
        let Some(item) = self.gallery_selected_item() else {
            return;
        };
        if item.kind != SavedKind::Screenshot {
            return;
        }
        let result = export_png(&self.export_dir, &saved_file_name(item.timestamp), &item.data);
        self.report_save(result.map(|_| ()).map_err(SessionError::from), TOAST_PICTURE_SAVED);
    }

    pub fn save_menu_select(&mut self, delta: isize) {
        if let Some(Overlay::SaveMenu { selected }) = self.overlay.as_mut() {
            *selected = step_selection(*selected, delta, SaveChoice::ALL.len());
        }
    }

    /// Run the chosen save menu entry.
    pub fn save_menu_confirm(&mut self, choice: Option<SaveChoice>) {
        let Some(Overlay::SaveMenu { selected }) = self.overlay else {
            return;
        };
        let choice = choice.unwrap_or(SaveChoice::ALL[selected % SaveChoice::ALL.len()]);
        self.overlay = None;
        match choice {
            SaveChoice::Picture => self.request_screenshot(),
            SaveChoice::Message => self.save_message(),
        }
    }

    // =========================================================================
    // Status
    // =========================================================================

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Show a toast, replacing any current one
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            remaining: TOAST_DURATION,
        });
    }

    /// Advance animations, the session and toasts by `dt`
    pub fn tick(&mut self, dt: Duration) {
        self.animation_frame = self.animation_frame.wrapping_add(1);

        if let Some(toast) = self.toast.as_mut() {
            toast.remaining = toast.remaining.saturating_sub(dt);
            if toast.remaining.is_zero() {
                self.toast = None;
            }
        }

        for event in self.session.tick(dt) {
            effects::process_session_event(self, &event);
        }

        let playing = self.session.navigator().is_playing();
        for cue in self.scenes.tick(self.current(), dt, playing) {
            effects::process_cue(self, cue);
        }
    }
}

/// Move a list selection by `delta`, clamped to `len`.
fn step_selection(selected: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.saturating_add_signed(delta).min(len - 1)
}
