//! A running gift: navigation, both memory stores and the mounted screen's
//! timed state.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::capture::Snapshot;
use crate::clock::{Clock, SystemClock};
use crate::navigation::{NavigationError, Navigator, Transition};
use crate::screen::Screen;
use crate::storage::{FileStorage, StorageBackend};
use crate::store::{
    CappedStore, MemoryPage, PhotoMemories, PhotoMemory, PhotoMemoryDraft, SavedItem,
    SavedItemDraft, SavedItems, StoreError,
};
use crate::tiles::{Mosaic, SequencerEvent, SequencerTiming, TileSequencer, Viewport};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("capture error: {0}")]
    Capture(#[from] crate::capture::CaptureError),

    #[error("{0} has no timed sequence")]
    NothingToPlay(Screen),
}

/// Configuration for a gift session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding the persisted stores.
    pub data_dir: PathBuf,

    /// Viewport used to scale the heart wall.
    pub viewport: Viewport,

    /// Heart-wall timing.
    pub timing: SequencerTiming,
}

impl SessionConfig {
    /// Create a config storing data under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            viewport: Viewport::new(1280, 1024),
            timing: SequencerTiming::default(),
        }
    }

    /// Set the viewport.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the heart-wall timing.
    pub fn with_timing(mut self, timing: SequencerTiming) -> Self {
        self.timing = timing;
        self
    }
}

/// Something the front-end should react to after a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The enter animation of `screen` finished.
    Settled(Screen),
    /// The mounted heart wall moved.
    HeartWall(SequencerEvent),
    /// A finished composition is ready to be rasterized and recorded.
    CaptureReady {
        page: MemoryPage,
        title: &'static str,
        snapshot: Snapshot,
    },
}

/// Owns the state behind every screen.
pub struct GiftSession<S, C> {
    navigator: Navigator,
    saved: SavedItems<S, C>,
    memories: PhotoMemories<S, C>,
    heart_wall: Option<TileSequencer>,
    viewport: Viewport,
    timing: SequencerTiming,
}

impl GiftSession<FileStorage, SystemClock> {
    /// Open the stores under `config.data_dir` with the system clock.
    pub fn open(config: SessionConfig) -> Self {
        let storage = FileStorage::new(&config.data_dir);
        tracing::info!(data_dir = %config.data_dir.display(), "opening gift session");
        Self::new(storage, SystemClock, &config)
    }
}

impl<S, C> GiftSession<S, C>
where
    S: StorageBackend + Clone,
    C: Clock + Clone,
{
    /// Build a session over any storage medium and clock.
    pub fn new(storage: S, clock: C, config: &SessionConfig) -> Self {
        Self {
            navigator: Navigator::new(),
            saved: CappedStore::saved_items(storage.clone(), clock.clone()),
            memories: CappedStore::photo_memories(storage, clock),
            heart_wall: None,
            viewport: config.viewport,
            timing: config.timing,
        }
    }

    pub fn current(&self) -> Screen {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn saved_items(&self) -> &SavedItems<S, C> {
        &self.saved
    }

    pub fn saved_items_mut(&mut self) -> &mut SavedItems<S, C> {
        &mut self.saved
    }

    pub fn memories(&self) -> &PhotoMemories<S, C> {
        &self.memories
    }

    pub fn memories_mut(&mut self) -> &mut PhotoMemories<S, C> {
        &mut self.memories
    }

    /// The heart wall, while the letter screen is mounted.
    pub fn heart_wall(&self) -> Option<&TileSequencer> {
        self.heart_wall.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Move to `target`, unmounting the current screen first.
    pub fn navigate(&mut self, target: Screen) -> Result<Transition, SessionError> {
        let transition = self.navigator.navigate_to(target)?;
        self.unmount();
        self.mount(target);
        Ok(transition)
    }

    /// Go to the current screen's back target, if it has one.
    pub fn back(&mut self) -> Option<Result<Transition, SessionError>> {
        let target = self.current().back_target()?;
        Some(self.navigate(target))
    }

    /// Dropping the wall tears down its timers.
    fn unmount(&mut self) {
        if let Some(wall) = self.heart_wall.take() {
            tracing::debug!(placed = wall.trail().len(), "heart wall unmounted");
        }
    }

    fn mount(&mut self, screen: Screen) {
        if screen == Screen::Letter {
            self.heart_wall = Some(TileSequencer::with_timing(self.viewport, self.timing));
        }
    }

    /// Dismiss the letter intro and start the heart wall.
    ///
    /// The wall's music is its own; the song's playback flag is untouched.
    pub fn start_letter(&mut self) -> Result<Option<SequencerEvent>, SessionError> {
        let wall = self
            .heart_wall
            .as_mut()
            .ok_or(SessionError::NothingToPlay(self.navigator.current()))?;
        Ok(wall.start())
    }

    /// Resize the viewport, rescaling a mounted heart wall.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(wall) = self.heart_wall.as_mut() {
            wall.resize(viewport);
        }
    }

    /// Advance the transition and the mounted screen by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        let was_transitioning = self.navigator.transition().is_some();
        self.navigator.tick(dt);
        if was_transitioning && self.navigator.transition().is_none() {
            events.push(SessionEvent::Settled(self.navigator.current()));
        }

        if let Some(wall) = self.heart_wall.as_mut() {
            for event in wall.advance(dt) {
                if event == SequencerEvent::CaptureRequested {
                    let page = MemoryPage::HeartWall;
                    events.push(SessionEvent::CaptureReady {
                        page,
                        title: page.default_title(),
                        snapshot: Snapshot::from_mosaic(&wall.mosaic()),
                    });
                }
                events.push(SessionEvent::HeartWall(event));
            }
        }

        events
    }

    /// The heart wall mosaic, if mounted.
    pub fn mosaic(&self) -> Option<Mosaic> {
        self.heart_wall.as_ref().map(TileSequencer::mosaic)
    }

    pub fn save_message(
        &mut self,
        page: Screen,
        text: impl Into<String>,
    ) -> Result<SavedItem, SessionError> {
        Ok(self.saved.save(SavedItemDraft::message(page, text))?)
    }

    pub fn save_screenshot(
        &mut self,
        page: Screen,
        data_url: impl Into<String>,
    ) -> Result<SavedItem, SessionError> {
        Ok(self.saved.save(SavedItemDraft::screenshot(page, data_url))?)
    }

    pub fn record_memory(
        &mut self,
        page: MemoryPage,
        data_url: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<PhotoMemory, SessionError> {
        Ok(self
            .memories
            .save(PhotoMemoryDraft::new(page, data_url, title))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use crate::tiles::Phase;

    fn session() -> GiftSession<MemoryStorage, ManualClock> {
        let config = SessionConfig::new("unused");
        GiftSession::new(MemoryStorage::new(), ManualClock::new(1_000), &config)
    }

    fn to_letter(session: &mut GiftSession<MemoryStorage, ManualClock>) {
        session.navigate(Screen::PresentSelection).unwrap();
        session.navigate(Screen::Letter).unwrap();
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::new("/tmp/gift").with_viewport(Viewport::new(390, 844));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/gift"));
        assert_eq!(config.viewport.width, 390);
    }

    #[test]
    fn test_rejected_navigation_keeps_state() {
        let mut session = session();
        let err = session.navigate(Screen::Letter).unwrap_err();
        assert!(matches!(err, SessionError::Navigation(_)));
        assert_eq!(session.current(), Screen::Home);
    }

    #[test]
    fn test_letter_mounts_heart_wall() {
        let mut session = session();
        assert!(session.heart_wall().is_none());
        to_letter(&mut session);
        assert_eq!(session.heart_wall().map(|w| w.phase()), Some(Phase::Idle));
    }

    #[test]
    fn test_leaving_letter_tears_down() {
        let mut session = session();
        to_letter(&mut session);
        session.start_letter().unwrap();
        session.navigate(Screen::LoveMessage).unwrap();
        assert!(session.heart_wall().is_none());
        assert!(session.tick(Duration::from_secs(60)).iter().all(|e| !matches!(e, SessionEvent::HeartWall(_))));
    }

    #[test]
    fn test_start_letter_off_screen() {
        let mut session = session();
        assert!(matches!(
            session.start_letter(),
            Err(SessionError::NothingToPlay(Screen::Home))
        ));
    }

    #[test]
    fn test_start_letter_plays_wall_audio_only() {
        let mut session = session();
        to_letter(&mut session);
        assert_eq!(session.start_letter().unwrap(), Some(SequencerEvent::StartAudio));
        assert!(session.heart_wall().unwrap().audio_playing());
        assert!(!session.navigator().is_playing());
        assert_eq!(session.start_letter().unwrap(), None);

        for screen in [Screen::LoveMessage, Screen::PresentSelection, Screen::Song] {
            session.navigate(screen).unwrap();
        }
        assert!(!session.navigator().is_playing());
    }

    #[test]
    fn test_settled_event() {
        let mut session = session();
        session.navigate(Screen::PresentSelection).unwrap();
        assert!(session.tick(Duration::from_millis(100)).is_empty());
        let events = session.tick(Duration::from_millis(300));
        assert_eq!(events, vec![SessionEvent::Settled(Screen::PresentSelection)]);
    }

    #[test]
    fn test_capture_ready_after_completion() {
        let mut session = session();
        to_letter(&mut session);
        session.start_letter().unwrap();
        let events = session.tick(Duration::from_secs(60));
        let capture = events
            .iter()
            .find_map(|e| match e {
                SessionEvent::CaptureReady { page, title, snapshot } => Some((*page, *title, snapshot.clone())),
                _ => None,
            })
            .expect("capture requested");
        assert_eq!(capture.0, MemoryPage::HeartWall);
        assert_eq!(capture.1, "💖 Heart Wall");
        assert!(!capture.2.is_blank());
    }

    #[test]
    fn test_back() {
        let mut session = session();
        assert!(session.back().is_none());
        session.navigate(Screen::PresentSelection).unwrap();
        session.navigate(Screen::Song).unwrap();
        session.back().unwrap().unwrap();
        assert_eq!(session.current(), Screen::PresentSelection);
    }

    #[test]
    fn test_saves_share_storage() {
        let mut session = session();
        session.save_message(Screen::LoveMessage, "always").unwrap();
        session
            .record_memory(MemoryPage::Song, "data:image/png;base64,AA==", "song")
            .unwrap();
        assert_eq!(session.saved_items().len(), 1);
        assert_eq!(session.memories().len(), 1);
    }
}
