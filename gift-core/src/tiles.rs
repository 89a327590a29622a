//! Heart-wall tile sequencer.
//!
//! Plays a fixed table of four-tile clusters onto a trail, one cluster per
//! tick, then lifts the finished mosaic and asks for a capture. All timing
//! goes through a [`TimerQueue`] so the sequence is driven by whatever clock
//! the caller feeds into [`TileSequencer::advance`].

use std::time::Duration;

use crate::timers::{Fired, TimerQueue};

/// Edge length of one heart tile in pixels.
pub const TILE_PX: i32 = 40;

/// Number of clusters in the mosaic.
pub const STEP_COUNT: usize = 24;

/// One entry of the composition table, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Tile positions relative to the cluster origin. Screen position is
    /// `origin - tile * TILE_PX`.
    pub tiles: [(i32, i32); 4],
    /// Cluster origin relative to the anchor; `y` grows upward.
    pub offset: (i32, i32),
}

const fn step(tiles: [(i32, i32); 4], offset: (i32, i32)) -> Step {
    Step { tiles, offset }
}

/// The fixed composition table.
pub const STEPS: [Step; STEP_COUNT] = [
    step([(0, 1), (0, 0), (-1, 0), (-1, -1)], (5, 3)),
    step([(0, 1), (0, 0), (-1, 0), (0, -1)], (5, 1)),
    step([(-1, 1), (0, 0), (-1, 0), (-1, -1)], (3, 4)),
    step([(0, 1), (0, 0), (-1, 0), (-1, -1)], (3, 2)),
    step([(-1, 1), (0, 0), (-1, 0), (0, -1)], (3, -1)),
    step([(0, -1), (0, 0), (-1, 0), (1, -1)], (2, 5)),
    step([(-1, -1), (0, 0), (-1, 0), (1, 0)], (2, 1)),
    step([(-1, 1), (0, 0), (-1, 0), (-1, -1)], (1, -1)),
    step([(0, -1), (0, 0), (-1, 0), (1, 0)], (1, -3)),
    step([(-1, 1), (0, 0), (-1, 0), (1, 0)], (1, 2)),
    step([(2, 0), (0, 0), (-1, 0), (1, 0)], (0, 3)),
    step([(0, 1), (0, 0), (-1, 0), (0, -1)], (0, 0)),
    step([(0, 1), (0, 0), (-1, 0), (-1, -1)], (-1, -4)),
    step([(1, 1), (0, 0), (-1, 0), (1, 0)], (0, -2)),
    step([(1, -1), (0, 0), (-1, 0), (1, 0)], (-2, 4)),
    step([(-1, -1), (0, 0), (-1, 0), (1, 0)], (-2, 2)),
    step([(0, 1), (0, 0), (-1, 0), (0, -1)], (-2, 0)),
    step([(0, 1), (0, 0), (-1, 0), (-1, -1)], (-3, -2)),
    step([(0, -1), (0, 0), (-1, 0), (1, 0)], (-4, 0)),
    step([(1, -1), (0, 0), (-1, 0), (1, 0)], (-3, 5)),
    step([(0, 1), (0, 0), (-1, 0), (-1, -1)], (-5, 3)),
    step([(1, 1), (0, 0), (-1, 0), (1, 0)], (-4, 1)),
    step([(0, 2), (0, 0), (0, -1), (0, 1)], (-6, 1)),
    step([(0, 2), (0, 0), (0, -1), (0, 1)], (6, 1)),
];

/// Index of the tile hidden on the closing cluster.
const CLOSING_HIDDEN_TILE: usize = 2;

/// Timing of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerTiming {
    pub initial_delay: Duration,
    pub step_interval: Duration,
    pub rise_interval: Duration,
    /// Pixels moved per rise tick.
    pub rise_speed: u32,
    /// Total rise in pixels.
    pub rise_distance: u32,
    /// Delay from rise start until the sequence is complete.
    pub settle: Duration,
    /// Delay from completion until the capture request.
    pub capture_delay: Duration,
}

impl Default for SequencerTiming {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(12_000),
            step_interval: Duration::from_millis(300),
            rise_interval: Duration::from_millis(22),
            rise_speed: 1,
            rise_distance: 120,
            settle: Duration::from_millis(3_000),
            capture_delay: Duration::from_millis(1_000),
        }
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The moving anchor starts at the viewport centre.
    pub fn center(&self) -> (i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

/// Uniform scale applied to the whole mosaic, chosen by breakpoint band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub factor: f32,
    /// True for every band below the desktop breakpoint.
    pub compact: bool,
}

impl Scale {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let min = viewport.width.min(viewport.height);
        let (factor, compact) = if min < 400 {
            (0.4, true)
        } else if min < 600 {
            (0.5, true)
        } else if min < 768 {
            (0.6, true)
        } else if min < 1024 {
            (0.75, true)
        } else {
            (1.0, false)
        };
        Self { factor, compact }
    }
}

/// A placed cluster on the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    pub step: usize,
    /// Tile positions on the mosaic grid (column right, row down).
    pub cells: [(i32, i32); 4],
    pub visible: [bool; 4],
}

impl Cluster {
    fn from_step(index: usize, step: &Step) -> Self {
        let (ox, oy) = step.offset;
        let cells = step.tiles.map(|(tx, ty)| (ox - tx, -oy - ty));
        Self {
            step: index,
            cells,
            visible: [true; 4],
        }
    }

    /// Grid cells of the tiles that are drawn.
    pub fn visible_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .zip(self.visible)
            .filter(|(_, shown)| *shown)
            .map(|(cell, _)| *cell)
    }
}

/// Sequencer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the intro overlay to be dismissed.
    Idle,
    /// Placing clusters; `placed` of `STEP_COUNT` are on the trail.
    Playing { placed: usize },
    /// Lifting the finished trail.
    Rising { distance: u32 },
    /// Sequence complete.
    Done,
}

/// Something the screen should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Background audio should start.
    StartAudio,
    Placed { step: usize, cluster: Cluster },
    RiseStarted,
    Rose { distance: u32 },
    Completed,
    /// The composition should be captured into the memory store.
    CaptureRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    InitialDelay,
    Step,
    RiseTick,
    Settle,
    Capture,
}

/// Renderable state of the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Mosaic {
    pub clusters: Vec<Cluster>,
    /// The moving cluster, shown only while placing.
    pub cursor: Option<Cluster>,
    /// Upward displacement in pixels.
    pub rise: u32,
    pub scale: Scale,
}

impl Mosaic {
    /// Every visible tile of the trail.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.clusters.iter().flat_map(Cluster::visible_cells)
    }

    /// Inclusive grid bounds `(min_col, min_row, max_col, max_row)`.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        self.cells().fold(None, |acc, (c, r)| match acc {
            None => Some((c, r, c, r)),
            Some((c0, r0, c1, r1)) => Some((c0.min(c), r0.min(r), c1.max(c), r1.max(r))),
        })
    }

    /// Pixel position of a grid cell relative to the anchor, after scale
    /// and rise.
    pub fn pixel(&self, (col, row): (i32, i32)) -> (f32, f32) {
        let tile = TILE_PX as f32 * self.scale.factor;
        let rise = self.rise as f32 * self.scale.factor;
        (col as f32 * tile, row as f32 * tile - rise)
    }
}

/// The heart-wall state machine.
#[derive(Debug)]
pub struct TileSequencer {
    timing: SequencerTiming,
    timers: TimerQueue<TimerKind>,
    phase: Phase,
    trail: Vec<Cluster>,
    cursor: Option<Cluster>,
    rise: u32,
    viewport: Viewport,
    scale: Scale,
    capture_requested: bool,
    torn_down: bool,
}

impl TileSequencer {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_timing(viewport, SequencerTiming::default())
    }

    pub fn with_timing(viewport: Viewport, timing: SequencerTiming) -> Self {
        Self {
            timing,
            timers: TimerQueue::new(),
            phase: Phase::Idle,
            trail: Vec::with_capacity(STEP_COUNT),
            cursor: None,
            rise: 0,
            viewport,
            scale: Scale::for_viewport(viewport),
            capture_requested: false,
            torn_down: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timing(&self) -> &SequencerTiming {
        &self.timing
    }

    /// Whether the wall's own music is playing: from `start` until teardown.
    pub fn audio_playing(&self) -> bool {
        !self.torn_down && self.phase != Phase::Idle
    }

    pub fn trail(&self) -> &[Cluster] {
        &self.trail
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Virtual time since mount.
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Armed timers. Zero after teardown.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn capture_requested(&self) -> bool {
        self.capture_requested
    }

    /// Recompute the scale band for a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scale = Scale::for_viewport(viewport);
    }

    /// Leave `Idle`. Returns `StartAudio` on the first call only.
    pub fn start(&mut self) -> Option<SequencerEvent> {
        if self.torn_down || self.phase != Phase::Idle {
            return None;
        }
        self.phase = Phase::Playing { placed: 0 };
        self.timers
            .set_timeout(self.timing.initial_delay, TimerKind::InitialDelay);
        tracing::debug!("tile sequencer started");
        Some(SequencerEvent::StartAudio)
    }

    /// Advance virtual time by `dt`, handling every timer that comes due.
    pub fn advance(&mut self, dt: Duration) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if self.torn_down {
            return events;
        }

        let target = self.timers.now() + dt;
        loop {
            let remaining = target.saturating_sub(self.timers.now());
            match self.timers.advance_one(remaining) {
                Some(fired) => self.on_timer(fired, &mut events),
                None => {
                    self.timers.advance(remaining);
                    break;
                }
            }
        }
        events
    }

    fn on_timer(&mut self, fired: Fired<TimerKind>, events: &mut Vec<SequencerEvent>) {
        match fired.kind {
            TimerKind::InitialDelay => {
                self.timers
                    .set_interval(self.timing.step_interval, TimerKind::Step);
            }
            TimerKind::Step => self.place_next(fired, events),
            TimerKind::RiseTick => {
                self.rise = (self.rise + self.timing.rise_speed).min(self.timing.rise_distance);
                if let Phase::Rising { distance } = &mut self.phase {
                    *distance = self.rise;
                }
                events.push(SequencerEvent::Rose {
                    distance: self.rise,
                });
                if self.rise >= self.timing.rise_distance {
                    self.timers.clear(fired.id);
                }
            }
            TimerKind::Settle => {
                self.phase = Phase::Done;
                self.timers.set_timeout(self.timing.capture_delay, TimerKind::Capture);
                events.push(SequencerEvent::Completed);
            }
            TimerKind::Capture => {
                self.capture_requested = true;
                events.push(SequencerEvent::CaptureRequested);
            }
        }
    }

    fn place_next(&mut self, fired: Fired<TimerKind>, events: &mut Vec<SequencerEvent>) {
        let index = self.trail.len();
        let Some(step) = STEPS.get(index) else {
            self.timers.clear(fired.id);
            return;
        };

        let mut cluster = Cluster::from_step(index, step);
        self.cursor = Some(cluster);

        let placed = index + 1;
        if placed == STEP_COUNT {
            cluster.visible[CLOSING_HIDDEN_TILE] = false;
            self.cursor = None;
        }
        self.trail.push(cluster);
        self.phase = Phase::Playing { placed };
        events.push(SequencerEvent::Placed {
            step: index,
            cluster,
        });

        if placed == STEP_COUNT {
            self.timers.clear(fired.id);
            self.begin_rise(events);
        }
    }

    fn begin_rise(&mut self, events: &mut Vec<SequencerEvent>) {
        self.phase = Phase::Rising { distance: 0 };
        self.timers
            .set_interval(self.timing.rise_interval, TimerKind::RiseTick);
        self.timers.set_timeout(self.timing.settle, TimerKind::Settle);
        events.push(SequencerEvent::RiseStarted);
    }

    /// Cancel every pending timer. Nothing further is placed.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            tracing::debug!(placed = self.trail.len(), "tile sequencer torn down");
        }
        self.timers.clear_all();
        self.torn_down = true;
    }

    /// Snapshot of the trail for rendering or capture.
    pub fn mosaic(&self) -> Mosaic {
        Mosaic {
            clusters: self.trail.clone(),
            cursor: self.cursor,
            rise: self.rise,
            scale: self.scale,
        }
    }
}

impl Drop for TileSequencer {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> Viewport {
        Viewport::new(1920, 1080)
    }

    #[test]
    fn test_scale_bands() {
        let cases = [
            (390, 844, 0.4, true),
            (500, 900, 0.5, true),
            (700, 700, 0.6, true),
            (1024, 800, 0.75, true),
            (1280, 1024, 1.0, false),
        ];
        for (w, h, factor, compact) in cases {
            let scale = Scale::for_viewport(Viewport::new(w, h));
            assert_eq!(scale.factor, factor, "{w}x{h}");
            assert_eq!(scale.compact, compact, "{w}x{h}");
        }
    }

    #[test]
    fn test_resize_recomputes_scale() {
        let mut seq = TileSequencer::new(desktop());
        assert_eq!(seq.scale().factor, 1.0);
        seq.resize(Viewport::new(360, 640));
        assert_eq!(seq.scale().factor, 0.4);
    }

    #[test]
    fn test_idle_until_started() {
        let mut seq = TileSequencer::new(desktop());
        assert!(seq.advance(Duration::from_secs(60)).is_empty());
        assert_eq!(seq.phase(), Phase::Idle);
        assert_eq!(seq.start(), Some(SequencerEvent::StartAudio));
        assert_eq!(seq.start(), None);
    }

    #[test]
    fn test_nothing_placed_during_initial_delay() {
        let mut seq = TileSequencer::new(desktop());
        seq.start();
        let timing = *seq.timing();
        let events = seq.advance(timing.initial_delay + timing.step_interval - Duration::from_millis(1));
        assert!(events.is_empty());
        assert!(seq.trail().is_empty());
    }

    #[test]
    fn test_cluster_cells_follow_offsets() {
        let cluster = Cluster::from_step(0, &STEPS[0]);
        // offset (5, 3), tiles (0,1) (0,0) (-1,0) (-1,-1)
        assert_eq!(cluster.cells, [(5, -4), (5, -3), (6, -3), (6, -2)]);
    }

    #[test]
    fn test_closing_cluster_hides_third_tile() {
        let mut seq = TileSequencer::new(desktop());
        seq.start();
        seq.advance(Duration::from_secs(60));
        let last = seq.trail().last().unwrap();
        assert_eq!(last.visible, [true, true, false, true]);
        assert!(seq.mosaic().cursor.is_none());
    }

    #[test]
    fn test_mosaic_bounds_and_pixels() {
        let mut seq = TileSequencer::new(Viewport::new(500, 900));
        seq.start();
        seq.advance(Duration::from_secs(60));
        let mosaic = seq.mosaic();
        let (c0, _, c1, _) = mosaic.bounds().unwrap();
        assert!(c0 < 0 && c1 > 0);
        assert_eq!(mosaic.rise, 120);
        let (x, y) = mosaic.pixel((2, 0));
        assert_eq!(x, 40.0);
        assert_eq!(y, -60.0);
    }

    #[test]
    fn test_teardown_clears_timers() {
        let mut seq = TileSequencer::new(desktop());
        seq.start();
        assert!(seq.pending_timers() > 0);
        seq.teardown();
        assert_eq!(seq.pending_timers(), 0);
        assert!(seq.start().is_none());
    }
}
