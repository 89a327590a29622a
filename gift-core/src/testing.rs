//! Testing utilities for the gift.
//!
//! - `TestHarness` for scripted sessions on in-memory storage and a manual
//!   clock
//! - `FailingRasterizer` for exercising capture failures
//! - Assertion helpers for store state

use std::time::Duration;

use crate::capture::{CaptureError, Rasterizer, Snapshot};
pub use crate::clock::ManualClock;
use crate::navigation::TRANSITION_DURATION;
use crate::screen::Screen;
use crate::session::{GiftSession, SessionConfig, SessionEvent};
use crate::storage::MemoryStorage;
use crate::tiles::SequencerTiming;

/// Epoch milliseconds the harness clock starts at.
pub const HARNESS_EPOCH_MS: i64 = 1_700_000_000_000;

/// A rasterizer that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn rasterize(&self, _snapshot: &Snapshot) -> Result<String, CaptureError> {
        Err(CaptureError::Task("rasterizer unavailable".to_string()))
    }
}

/// A session on shared in-memory storage with a manual clock.
pub struct TestHarness {
    pub session: GiftSession<MemoryStorage, ManualClock>,
    pub storage: MemoryStorage,
    pub clock: ManualClock,
    config: SessionConfig,
    /// Every event returned by `tick`, in order.
    pub events: Vec<SessionEvent>,
}

impl TestHarness {
    /// Create a harness with default config.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::new("unused"))
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::with_storage(MemoryStorage::new(), config)
    }

    /// Create a harness over existing storage, like reopening the gift.
    pub fn with_storage(storage: MemoryStorage, config: SessionConfig) -> Self {
        let clock = ManualClock::new(HARNESS_EPOCH_MS);
        let session = GiftSession::new(storage.clone(), clock.clone(), &config);
        Self {
            session,
            storage,
            clock,
            config,
            events: Vec::new(),
        }
    }

    /// A fresh session over the same storage.
    pub fn reload(&self) -> Self {
        Self::with_storage(self.storage.clone(), self.config.clone())
    }

    pub fn timing(&self) -> SequencerTiming {
        self.config.timing
    }

    /// Navigate through `path` in order, settling each transition.
    ///
    /// Panics if a step is not allowed.
    pub fn walk(&mut self, path: &[Screen]) -> &mut Self {
        for &screen in path {
            if let Err(e) = self.session.navigate(screen) {
                panic!("navigation to {screen} failed: {e}");
            }
            self.tick(TRANSITION_DURATION);
        }
        self
    }

    /// Walk from the start screen to the letter.
    pub fn open_letter(&mut self) -> &mut Self {
        self.walk(&[Screen::PresentSelection, Screen::Letter])
    }

    /// Advance session time and the wall clock together.
    pub fn tick(&mut self, dt: Duration) -> Vec<SessionEvent> {
        self.clock.advance(dt.as_millis() as i64);
        let events = self.session.tick(dt);
        self.events.extend(events.iter().cloned());
        events
    }

    /// Advance in `step` increments for a total of `total`.
    pub fn run_for(&mut self, total: Duration, step: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            let dt = step.min(total - elapsed);
            events.extend(self.tick(dt));
            elapsed += dt;
        }
        events
    }

    /// Number of clusters placed so far, or zero if the wall is unmounted.
    pub fn placed(&self) -> usize {
        self.session.heart_wall().map(|w| w.trail().len()).unwrap_or(0)
    }

    pub fn assert_screen(&self, expected: Screen) {
        assert_eq!(self.session.current(), expected, "unexpected screen");
    }

    /// Assert saved-item and memory counts.
    pub fn assert_counts(&self, saved: usize, memories: usize) {
        assert_eq!(self.session.saved_items().len(), saved, "saved item count");
        assert_eq!(self.session.memories().len(), memories, "memory count");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
