//! Headless gift interface for scripted use.
//!
//! Drives a [`GiftSession`] without a terminal UI. Timed screens run on
//! virtual time, so a full heart wall plays in a single call.
//!
//! # Example
//!
//! ```ignore
//! use gift_core::headless::HeadlessGift;
//! use gift_core::{Screen, SessionConfig};
//!
//! let mut gift = HeadlessGift::open(SessionConfig::new("./.gift-data"));
//! gift.go(Screen::PresentSelection)?;
//! gift.go(Screen::Letter)?;
//! let report = gift.play()?;
//! println!("placed {} clusters", report.placed);
//! ```

use std::time::Duration;

use crate::capture::{PngRasterizer, Rasterizer};
use crate::clock::{Clock, SystemClock};
use crate::navigation::Transition;
use crate::screen::Screen;
use crate::session::{GiftSession, SessionConfig, SessionError, SessionEvent};
use crate::storage::{FileStorage, StorageBackend};
use crate::store::{PhotoMemory, SavedItem};
use crate::tiles::{Phase, SequencerEvent};

/// Virtual time step used when playing a timed screen.
const PLAY_STEP: Duration = Duration::from_millis(100);

/// Upper bound on virtual time for one playback.
const PLAY_LIMIT: Duration = Duration::from_secs(120);

/// Outcome of [`HeadlessGift::play`].
#[derive(Debug, Clone, Default)]
pub struct PlayReport {
    /// Clusters on the trail when playback stopped.
    pub placed: usize,
    /// Whether the sequence reached completion.
    pub completed: bool,
    /// Whether the finished composition was handed to the rasterizer.
    pub captured: bool,
    /// The memory recorded from the finished composition. `None` when the
    /// capture or the store write failed.
    pub memory: Option<PhotoMemory>,
    /// Virtual time spent.
    pub elapsed: Duration,
}

/// A gift session without a UI.
pub struct HeadlessGift<S, C, R = PngRasterizer> {
    session: GiftSession<S, C>,
    rasterizer: R,
}

impl HeadlessGift<FileStorage, SystemClock> {
    /// Open the stores under `config.data_dir`.
    pub fn open(config: SessionConfig) -> Self {
        Self::from_session(GiftSession::open(config), PngRasterizer::default())
    }
}

impl<S, C, R> HeadlessGift<S, C, R>
where
    S: StorageBackend + Clone,
    C: Clock + Clone,
    R: Rasterizer,
{
    pub fn from_session(session: GiftSession<S, C>, rasterizer: R) -> Self {
        Self {
            session,
            rasterizer,
        }
    }

    pub fn session(&self) -> &GiftSession<S, C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GiftSession<S, C> {
        &mut self.session
    }

    pub fn current(&self) -> Screen {
        self.session.current()
    }

    /// Navigate to `target`, settling the transition immediately.
    pub fn go(&mut self, target: Screen) -> Result<Transition, SessionError> {
        let transition = self.session.navigate(target)?;
        self.session.navigator_mut().tick(crate::navigation::TRANSITION_DURATION);
        Ok(transition)
    }

    /// Save a message from the current screen.
    pub fn save(&mut self, text: &str) -> Result<SavedItem, SessionError> {
        let page = self.current();
        self.session.save_message(page, text)
    }

    pub fn items(&self) -> Vec<SavedItem> {
        self.session.saved_items().list()
    }

    pub fn memories(&self) -> Vec<PhotoMemory> {
        self.session.memories().list()
    }

    /// Delete a saved item or memory by id.
    pub fn delete(&mut self, id: &str) -> bool {
        self.session.saved_items_mut().delete(id) || self.session.memories_mut().delete(id)
    }

    /// Wipe both stores.
    pub fn clear(&mut self) {
        self.session.saved_items_mut().clear();
        self.session.memories_mut().clear();
    }

    /// Run the current screen's timed sequence to completion and record the
    /// resulting memory. Capture failures are logged and leave
    /// `memory` empty; they never fail the run.
    pub fn play(&mut self) -> Result<PlayReport, SessionError> {
        self.session.start_letter()?;

        let mut report = PlayReport::default();
        while report.elapsed < PLAY_LIMIT {
            report.elapsed += PLAY_STEP;
            for event in self.session.tick(PLAY_STEP) {
                match event {
                    SessionEvent::CaptureReady {
                        page,
                        title,
                        snapshot,
                    } => {
                        report.captured = true;
                        let data_url = match self.rasterizer.rasterize(&snapshot) {
                            Ok(data_url) => data_url,
                            Err(e) => {
                                tracing::error!(%page, "heart wall capture failed: {e}");
                                continue;
                            }
                        };
                        match self.session.record_memory(page, data_url, title) {
                            Ok(memory) => report.memory = Some(memory),
                            Err(e) => tracing::error!(%page, "could not record memory: {e}"),
                        }
                    }
                    SessionEvent::HeartWall(SequencerEvent::Completed) => report.completed = true,
                    _ => {}
                }
            }
            if report.captured {
                break;
            }
        }

        if let Some(wall) = self.session.heart_wall() {
            report.placed = wall.trail().len();
            report.completed |= wall.phase() == Phase::Done;
        }
        Ok(report)
    }

    /// One-line summary of the session.
    pub fn status(&self) -> String {
        let phase = match self.session.heart_wall().map(|w| w.phase()) {
            Some(Phase::Idle) => " | heart wall: waiting".to_string(),
            Some(Phase::Playing { placed }) => format!(" | heart wall: {placed} placed"),
            Some(Phase::Rising { distance }) => format!(" | heart wall: rising {distance}px"),
            Some(Phase::Done) => " | heart wall: done".to_string(),
            None => String::new(),
        };
        format!(
            "screen: {} | playing: {} | saved items: {} | memories: {}{phase}",
            self.current(),
            self.session.navigator().is_playing(),
            self.session.saved_items().len(),
            self.session.memories().len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use crate::store::MemoryPage;

    fn gift() -> HeadlessGift<MemoryStorage, ManualClock> {
        let session = GiftSession::new(
            MemoryStorage::new(),
            ManualClock::new(10),
            &SessionConfig::new("unused"),
        );
        HeadlessGift::from_session(session, PngRasterizer { cell_px: 2 })
    }

    #[test]
    fn test_play_records_heart_wall_memory() {
        let mut gift = gift();
        gift.go(Screen::PresentSelection).unwrap();
        gift.go(Screen::Letter).unwrap();
        let report = gift.play().unwrap();
        assert_eq!(report.placed, 24);
        assert!(report.completed);
        let memory = report.memory.unwrap();
        assert_eq!(memory.page_id, MemoryPage::HeartWall);
        assert!(memory.data_url.starts_with("data:image/png;base64,"));
        assert_eq!(gift.memories().len(), 1);
    }

    #[test]
    fn test_play_survives_a_full_store() {
        let session = GiftSession::new(
            MemoryStorage::with_quota(64),
            ManualClock::new(10),
            &SessionConfig::new("unused"),
        );
        let mut gift = HeadlessGift::from_session(session, PngRasterizer { cell_px: 2 });
        gift.go(Screen::PresentSelection).unwrap();
        gift.go(Screen::Letter).unwrap();

        let report = gift.play().unwrap();
        assert!(report.completed);
        assert!(report.captured);
        assert!(report.memory.is_none());
        assert!(gift.memories().is_empty());
    }

    #[test]
    fn test_play_elsewhere_fails() {
        let mut gift = gift();
        assert!(gift.play().is_err());
    }

    #[test]
    fn test_save_uses_current_page() {
        let mut gift = gift();
        gift.go(Screen::PresentSelection).unwrap();
        let item = gift.save("hi").unwrap();
        assert_eq!(item.page_id, Screen::PresentSelection);
        assert!(gift.delete(&item.id));
        assert!(!gift.delete(&item.id));
    }

    #[test]
    fn test_status_line() {
        let gift = gift();
        assert_eq!(
            gift.status(),
            "screen: home | playing: false | saved items: 0 | memories: 0"
        );
    }
}
