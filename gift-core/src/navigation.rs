//! Navigation controller.
//!
//! Holds the current screen and the playback flag. `navigate_to` is the only
//! mutator of the current screen and rejects targets outside the source
//! screen's capability set.

use std::time::Duration;

use thiserror::Error;

use crate::screen::Screen;

/// Length of the exit/enter fade between screens.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(400);

/// Errors from navigation requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("{from} cannot navigate to {to}")]
    Unreachable { from: Screen, to: Screen },
}

/// An in-flight exit/enter animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Screen,
    pub to: Screen,
    pub elapsed: Duration,
}

impl Transition {
    /// Progress in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        (self.elapsed.as_secs_f32() / TRANSITION_DURATION.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= TRANSITION_DURATION
    }
}

/// Owned navigation state, passed by reference to screen renderers.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Screen,
    playing: bool,
    transition: Option<Transition>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Screen::START,
            playing: false,
            transition: None,
        }
    }

    /// The screen currently shown.
    pub fn current(&self) -> Screen {
        self.current
    }

    /// Request a transition from the current screen to `target`.
    ///
    /// Does not wait for the previous transition to finish; a new request
    /// replaces it.
    pub fn navigate_to(&mut self, target: Screen) -> Result<Transition, NavigationError> {
        let from = self.current;
        if !from.can_reach(target) {
            tracing::warn!(%from, to = %target, "rejected navigation");
            return Err(NavigationError::Unreachable { from, to: target });
        }

        tracing::info!(%from, to = %target, "navigate");
        Ok(self.replace(target))
    }

    /// Replace the current screen without consulting the capability table.
    ///
    /// Used when restoring a session or seeding tests.
    pub fn force(&mut self, target: Screen) -> Transition {
        self.replace(target)
    }

    fn replace(&mut self, target: Screen) -> Transition {
        let transition = Transition {
            from: self.current,
            to: target,
            elapsed: Duration::ZERO,
        };
        self.current = target;
        self.transition = Some(transition);
        transition
    }

    /// Advance the transition animation.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(transition) = self.transition.as_mut() {
            transition.elapsed += dt;
            if transition.is_finished() {
                self.transition = None;
            }
        }
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Progress of the enter animation, `1.0` when settled.
    pub fn transition_progress(&self) -> f32 {
        self.transition.map(|t| t.progress()).unwrap_or(1.0)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Flip the playback flag, returning the new value.
    pub fn toggle_playback(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }
}
