//! Engine for a small interactive gift.
//!
//! This crate provides:
//! - Screen navigation over a fixed capability table
//! - Two capped, persisted memory stores (saved items and photo memories)
//! - The heart-wall tile sequencer, driven by virtual time
//! - PNG capture of finished compositions
//!
//! # Quick Start
//!
//! ```ignore
//! use gift_core::{GiftSession, Screen, SessionConfig};
//!
//! let mut session = GiftSession::open(SessionConfig::new("./.gift-data"));
//! session.navigate(Screen::PresentSelection)?;
//! session.save_message(Screen::PresentSelection, "for you")?;
//! ```

pub mod capture;
pub mod clock;
pub mod headless;
pub mod navigation;
pub mod screen;
pub mod session;
pub mod storage;
pub mod store;
pub mod testing;
pub mod tiles;
pub mod timers;

// Primary public API
pub use capture::{CaptureError, PngRasterizer, Rasterizer, Snapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use headless::{HeadlessGift, PlayReport};
pub use navigation::{NavigationError, Navigator, Transition};
pub use screen::Screen;
pub use session::{GiftSession, SessionConfig, SessionError, SessionEvent};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use store::{
    ItemFilter, MemoryPage, PhotoMemory, SavedItem, SavedKind, StoreError, StorePolicy,
};
pub use testing::{FailingRasterizer, TestHarness};
pub use tiles::{Phase, SequencerEvent, TileSequencer, Viewport};
