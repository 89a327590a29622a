//! Screen-local state that lives only while its screen is mounted.

use std::time::Duration;

use gift_core::Screen;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::{LOVE_MESSAGES, PRESENTS, TRACKS};

/// Period of the "I LOVE YOU" timeline.
pub const LOVE_TIMELINE: Duration = Duration::from_millis(4_300);

/// Lifetime of a confetti burst.
pub const CONFETTI_LIFETIME: Duration = Duration::from_millis(2_000);

const CONFETTI_PER_PRESS: usize = 15;
const CONFETTI_KEPT: usize = 40;
const FLOATING_HEARTS: usize = 15;

/// A sound cue in the letter timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Blop,
    Blup,
}

/// Cue times within one timeline period, in milliseconds.
const CUES: [(u64, Cue); 4] = [
    (1_000, Cue::Blop),
    (2_200, Cue::Blop),
    (3_250, Cue::Blop),
    (3_400, Cue::Blup),
];

/// Which of the eight letters of "I LOVE YOU" show at `at` into a period.
pub fn visible_letters(at: Duration) -> [bool; 8] {
    let ms = at.as_millis() as u64 % LOVE_TIMELINE.as_millis() as u64;
    // I L O V E Y O U
    match ms {
        0..=999 => [true; 8],
        1_000..=2_199 => [true, false, false, false, false, true, true, true],
        2_200..=3_249 => [true, false, false, false, false, false, false, true],
        3_250..=3_399 => [false, false, false, false, false, false, false, true],
        3_400..=4_049 => [false; 8],
        _ => [true; 8],
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomeState {
    /// 0 accepts, 1 declines.
    pub selected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PresentsState {
    pub selected: usize,
}

impl PresentsState {
    pub fn target(&self) -> Screen {
        PRESENTS[self.selected.min(PRESENTS.len() - 1)].0
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % PRESENTS.len();
    }

    pub fn prev(&mut self) {
        self.selected = (self.selected + PRESENTS.len() - 1) % PRESENTS.len();
    }
}

#[derive(Debug, Clone, Default)]
pub struct SongState {
    pub track: usize,
    pub position: Duration,
}

impl SongState {
    pub fn length(&self) -> Duration {
        Duration::from_secs(TRACKS[self.track].1)
    }

    pub fn select(&mut self, track: usize) {
        self.track = track % TRACKS.len();
        self.position = Duration::ZERO;
    }

    /// Advance playback, moving to the next track at the end.
    pub fn tick(&mut self, dt: Duration, playing: bool) {
        if !playing {
            return;
        }
        self.position += dt;
        if self.position >= self.length() {
            self.select(self.track + 1);
        }
    }

    pub fn progress(&self) -> f64 {
        (self.position.as_secs_f64() / self.length().as_secs_f64()).min(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct PicturesState {
    pub elapsed: Duration,
    pub sound_on: bool,
    /// The last cue played and how long ago.
    pub last_cue: Option<(Cue, Duration)>,
}

impl Default for PicturesState {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
            sound_on: true,
            last_cue: None,
        }
    }
}

impl PicturesState {
    pub fn letters(&self) -> [bool; 8] {
        visible_letters(self.elapsed)
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        self.sound_on
    }

    /// Advance the timeline, returning the cues crossed.
    pub fn tick(&mut self, dt: Duration) -> Vec<Cue> {
        let period = LOVE_TIMELINE.as_millis() as u64;
        let before = self.elapsed.as_millis() as u64;
        self.elapsed += dt;
        let after = self.elapsed.as_millis() as u64;

        let mut crossed = Vec::new();
        for cycle in before / period..=after / period {
            for (at, cue) in CUES {
                let abs = cycle * period + at;
                if abs > before && abs <= after {
                    crossed.push(cue);
                }
            }
        }

        if let Some((_, age)) = self.last_cue.as_mut() {
            *age += dt;
        }
        if let Some(&cue) = crossed.last() {
            self.last_cue = Some((cue, Duration::ZERO));
        }
        crossed
    }
}

/// A confetti piece, offset from the heart in cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    pub dx: f32,
    pub dy: f32,
    pub color: usize,
    pub delay: Duration,
    pub age: Duration,
}

/// A heart drifting up the love screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingHeart {
    /// Horizontal position as a fraction of the width.
    pub x: f32,
    pub delay: Duration,
    pub duration: Duration,
}

impl FloatingHeart {
    /// Height as a fraction of the screen at `t`, or `None` before it starts.
    pub fn height_at(&self, t: Duration) -> Option<f32> {
        let t = t.checked_sub(self.delay)?;
        let period = self.duration.as_secs_f32().max(0.001);
        Some((t.as_secs_f32() % period) / period)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoveState {
    pub hearts: u32,
    pub message: usize,
    pub confetti: Vec<Confetti>,
    pub floating: Vec<FloatingHeart>,
    pub elapsed: Duration,
}

impl LoveState {
    pub fn new(rng: &mut impl Rng) -> Self {
        let floating = (0..FLOATING_HEARTS)
            .map(|_| FloatingHeart {
                x: rng.gen_range(0.0..1.0),
                delay: Duration::from_secs_f32(rng.gen_range(0.0..5.0)),
                duration: Duration::from_secs_f32(rng.gen_range(5.0..10.0)),
            })
            .collect();
        Self {
            floating,
            ..Self::default()
        }
    }

    pub fn current_message(&self) -> &'static str {
        LOVE_MESSAGES[self.message % LOVE_MESSAGES.len()]
    }

    pub fn next_message(&mut self) {
        self.message = (self.message + 1) % LOVE_MESSAGES.len();
    }

    /// Count a heart press and burst confetti around it.
    pub fn press_heart(&mut self, rng: &mut impl Rng, palette_len: usize) {
        self.hearts += 1;

        let overflow = self.confetti.len().saturating_sub(CONFETTI_KEPT);
        self.confetti.drain(..overflow);

        let colors: Vec<usize> = (0..palette_len.max(1)).collect();
        for _ in 0..CONFETTI_PER_PRESS {
            self.confetti.push(Confetti {
                dx: rng.gen_range(-0.5..0.5) * 24.0,
                dy: rng.gen_range(-0.5..0.5) * 8.0,
                color: colors.choose(rng).copied().unwrap_or(0),
                delay: Duration::from_secs_f32(rng.gen_range(0.0..0.3)),
                age: Duration::ZERO,
            });
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
        for piece in &mut self.confetti {
            piece.age += dt;
        }
        self.confetti.retain(|piece| piece.age < CONFETTI_LIFETIME);
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoothState {
    pub selected: usize,
}

/// Local state for every screen.
#[derive(Debug, Clone, Default)]
pub struct Scenes {
    pub home: HomeState,
    pub presents: PresentsState,
    pub song: SongState,
    pub pictures: PicturesState,
    pub love: LoveState,
    pub booth: BoothState,
}

impl Scenes {
    /// Fresh state for a screen being mounted.
    pub fn mount(&mut self, screen: Screen, rng: &mut impl Rng) {
        match screen {
            Screen::Home => self.home = HomeState::default(),
            Screen::PresentSelection => self.presents = PresentsState::default(),
            Screen::Song => self.song = SongState::default(),
            Screen::PictureAnimation => self.pictures = PicturesState::default(),
            Screen::LoveMessage => self.love = LoveState::new(rng),
            Screen::PhotoBooth => self.booth = BoothState::default(),
            Screen::AcceptConfirmation | Screen::Letter => {}
        }
    }

    /// Advance the mounted screen's animations.
    pub fn tick(&mut self, screen: Screen, dt: Duration, playing: bool) -> Vec<Cue> {
        match screen {
            Screen::Song => self.song.tick(dt, playing),
            Screen::PictureAnimation => return self.pictures.tick(dt),
            Screen::LoveMessage => self.love.tick(dt),
            _ => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_letter_timeline() {
        let at = |ms| visible_letters(Duration::from_millis(ms));
        assert_eq!(at(0), [true; 8]);
        assert_eq!(at(1_500), [true, false, false, false, false, true, true, true]);
        assert_eq!(at(3_300), [false, false, false, false, false, false, false, true]);
        assert_eq!(at(3_500), [false; 8]);
        assert_eq!(at(4_200), [true; 8]);
        // Replays every period
        assert_eq!(at(4_300 + 1_500), at(1_500));
    }

    #[test]
    fn test_cues_across_periods() {
        let mut pictures = PicturesState::default();
        let cues = pictures.tick(Duration::from_millis(4_300 * 2));
        assert_eq!(cues.len(), 8);
        assert_eq!(pictures.last_cue, Some((Cue::Blup, Duration::ZERO)));

        let cues = pictures.tick(Duration::from_millis(500));
        assert!(cues.is_empty());
        assert_eq!(pictures.last_cue, Some((Cue::Blup, Duration::from_millis(500))));
    }

    #[test]
    fn test_confetti_expires() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut love = LoveState::new(&mut rng);
        love.press_heart(&mut rng, 7);
        assert_eq!(love.hearts, 1);
        assert_eq!(love.confetti.len(), 15);
        assert!(love.confetti.iter().all(|c| c.color < 7));

        love.tick(Duration::from_millis(1_999));
        assert_eq!(love.confetti.len(), 15);
        love.tick(Duration::from_millis(1));
        assert!(love.confetti.is_empty());
    }

    #[test]
    fn test_confetti_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut love = LoveState::new(&mut rng);
        for _ in 0..10 {
            love.press_heart(&mut rng, 3);
        }
        assert!(love.confetti.len() <= CONFETTI_KEPT + CONFETTI_PER_PRESS);
        assert_eq!(love.hearts, 10);
    }

    #[test]
    fn test_messages_rotate() {
        let mut love = LoveState::default();
        for _ in 0..LOVE_MESSAGES.len() {
            love.next_message();
        }
        assert_eq!(love.current_message(), LOVE_MESSAGES[0]);
    }

    #[test]
    fn test_song_advances_only_while_playing() {
        let mut song = SongState::default();
        song.tick(Duration::from_secs(10), false);
        assert_eq!(song.position, Duration::ZERO);
        song.tick(Duration::from_secs(TRACKS[0].1), true);
        assert_eq!(song.track, 1);
        assert_eq!(song.position, Duration::ZERO);
    }

    #[test]
    fn test_presents_wrap() {
        let mut presents = PresentsState::default();
        presents.prev();
        assert_eq!(presents.target(), Screen::PhotoBooth);
        presents.next();
        assert_eq!(presents.target(), Screen::Song);
    }
}
