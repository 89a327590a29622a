//! Virtual-time timer queue.
//!
//! Stands in for interval/timeout callbacks so timed sequences can be driven
//! by real frame deltas in the TUI and by fixed steps in tests.

use std::time::Duration;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due during `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TimerId,
    pub kind: K,
    /// Virtual time at which the timer was due.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Timer<K> {
    id: TimerId,
    kind: K,
    deadline: Duration,
    period: Option<Duration>,
}

/// Pending timeouts and intervals keyed by a caller-defined kind.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<K>>,
}

impl<K: Copy> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Fire `kind` once after `delay`.
    pub fn set_timeout(&mut self, delay: Duration, kind: K) -> TimerId {
        self.push(delay, None, kind)
    }

    /// Fire `kind` every `period`. A zero period is clamped to 1 ms.
    pub fn set_interval(&mut self, period: Duration, kind: K) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.push(period, Some(period), kind)
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            deadline: self.now + delay,
            period,
        });
        id
    }

    /// Cancel a timer. Returns whether it was still armed.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every armed timer.
    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    /// Move virtual time forward by `dt` and collect due timers.
    ///
    /// Timers fire in deadline order, ties broken by creation order. An
    /// interval re-arms from its previous deadline, so a large `dt` yields
    /// every tick it spans.
    pub fn advance(&mut self, dt: Duration) -> Vec<Fired<K>> {
        let target = self.now + dt;
        let mut fired = Vec::new();

        while let Some(index) = self.next_due(target) {
            let timer = &mut self.timers[index];
            let at = timer.deadline;
            fired.push(Fired {
                id: timer.id,
                kind: timer.kind,
                at,
            });
            self.now = at;
            match timer.period {
                Some(period) => timer.deadline += period,
                None => {
                    self.timers.remove(index);
                }
            }
        }

        self.now = target;
        fired
    }

    /// Like `advance`, but stops after the first due timer so the caller can
    /// react (arm or clear timers) before later ones are considered.
    pub fn advance_one(&mut self, dt: Duration) -> Option<Fired<K>> {
        let target = self.now + dt;
        let index = self.next_due(target)?;
        let timer = &mut self.timers[index];
        let fired = Fired {
            id: timer.id,
            kind: timer.kind,
            at: timer.deadline,
        };
        self.now = timer.deadline;
        match timer.period {
            Some(period) => timer.deadline += period,
            None => {
                self.timers.remove(index);
            }
        }
        Some(fired)
    }

    fn next_due(&self, target: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= target)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Once,
        Tick,
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut q = TimerQueue::new();
        q.set_timeout(ms(100), Kind::Once);

        assert!(q.advance(ms(99)).is_empty());
        let fired = q.advance(ms(1));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, Kind::Once);
        assert_eq!(fired[0].at, ms(100));
        assert!(q.advance(ms(1000)).is_empty());
        assert!(q.is_idle());
    }

    #[test]
    fn test_interval_catches_up() {
        let mut q = TimerQueue::new();
        q.set_interval(ms(300), Kind::Tick);
        let fired = q.advance(ms(1000));
        let times: Vec<_> = fired.iter().map(|f| f.at).collect();
        assert_eq!(times, vec![ms(300), ms(600), ms(900)]);
        assert_eq!(q.now(), ms(1000));
    }

    #[test]
    fn test_fire_order_by_deadline_then_creation() {
        let mut q = TimerQueue::new();
        q.set_timeout(ms(50), Kind::Tick);
        q.set_timeout(ms(20), Kind::Once);
        q.set_timeout(ms(50), Kind::Once);
        let kinds: Vec<_> = q.advance(ms(60)).into_iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![Kind::Once, Kind::Tick, Kind::Once]);
    }

    #[test]
    fn test_clear() {
        let mut q = TimerQueue::new();
        let id = q.set_interval(ms(10), Kind::Tick);
        q.set_timeout(ms(10), Kind::Once);
        assert!(q.clear(id));
        assert!(!q.clear(id));
        assert_eq!(q.pending(), 1);
        q.clear_all();
        assert!(q.advance(ms(100)).is_empty());
    }

    #[test]
    fn test_advance_one_stops_at_first() {
        let mut q = TimerQueue::new();
        q.set_interval(ms(10), Kind::Tick);
        let first = q.advance_one(ms(35)).unwrap();
        assert_eq!(first.at, ms(10));
        assert_eq!(q.now(), ms(10));
        let second = q.advance_one(ms(25)).unwrap();
        assert_eq!(second.at, ms(20));
    }
}
