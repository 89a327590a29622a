//! Screen registry: the closed set of pages and the targets each may request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::MemoryPage;

/// A page of the gift. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Home,
    AcceptConfirmation,
    PresentSelection,
    Song,
    PictureAnimation,
    Letter,
    LoveMessage,
    PhotoBooth,
}

impl Screen {
    /// The screen shown on a fresh start.
    pub const START: Screen = Screen::Home;

    /// Every screen, in presentation order.
    pub const ALL: [Screen; 8] = [
        Screen::Home,
        Screen::AcceptConfirmation,
        Screen::PresentSelection,
        Screen::Song,
        Screen::PictureAnimation,
        Screen::Letter,
        Screen::LoveMessage,
        Screen::PhotoBooth,
    ];

    /// Stable kebab-case identifier, also used as the saved-item page id.
    pub fn id(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::AcceptConfirmation => "accept-confirmation",
            Screen::PresentSelection => "present-selection",
            Screen::Song => "song",
            Screen::PictureAnimation => "picture-animation",
            Screen::Letter => "letter",
            Screen::LoveMessage => "love-message",
            Screen::PhotoBooth => "photo-booth",
        }
    }

    /// Human-readable title for headers and the status bar.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Please accept my gift",
            Screen::AcceptConfirmation => "How dare you!",
            Screen::PresentSelection => "Presents for you",
            Screen::Song => "Unforgettable song",
            Screen::PictureAnimation => "I love you",
            Screen::Letter => "Heart wall",
            Screen::LoveMessage => "Love message",
            Screen::PhotoBooth => "Photo booth",
        }
    }

    /// Navigation targets this screen is allowed to request.
    pub fn allowed_targets(self) -> &'static [Screen] {
        match self {
            Screen::Home => &[Screen::PresentSelection, Screen::AcceptConfirmation],
            Screen::AcceptConfirmation => &[Screen::Home],
            Screen::PresentSelection => &[
                Screen::Song,
                Screen::PictureAnimation,
                Screen::Letter,
                Screen::PhotoBooth,
            ],
            Screen::Song => &[Screen::PresentSelection],
            Screen::PictureAnimation => &[Screen::PresentSelection],
            Screen::Letter => &[Screen::LoveMessage],
            Screen::LoveMessage => &[Screen::PresentSelection],
            Screen::PhotoBooth => &[Screen::Home],
        }
    }

    /// Whether `target` is in this screen's capability set.
    pub fn can_reach(self, target: Screen) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// The hard-coded "back" target, if the screen offers one.
    pub fn back_target(self) -> Option<Screen> {
        match self {
            Screen::Home | Screen::PresentSelection => None,
            Screen::AcceptConfirmation | Screen::PhotoBooth => Some(Screen::Home),
            Screen::Letter => Some(Screen::LoveMessage),
            Screen::Song | Screen::PictureAnimation | Screen::LoveMessage => {
                Some(Screen::PresentSelection)
            }
        }
    }

    /// The photo-memory slot this screen captures into, if any.
    pub fn memory_page(self) -> Option<MemoryPage> {
        match self {
            Screen::Song => Some(MemoryPage::Song),
            Screen::Letter => Some(MemoryPage::HeartWall),
            Screen::LoveMessage => Some(MemoryPage::LoveMessage),
            Screen::PictureAnimation => Some(MemoryPage::Pictures),
            _ => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error parsing a screen identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown screen: {0}")]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.id() == s)
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}
