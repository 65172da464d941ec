//! Session Clock
//!
//! Debounce timing needs a monotonic wall clock. The control loop reads it
//! once per frame and hands the resulting [`Timestamp`] to the engine, so the
//! engine itself never touches the system clock and stays deterministic
//! under test.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Microseconds since the owning clock's epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Epoch of the session clock.
    pub const ZERO: Timestamp = Timestamp(0);

    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000)
    }

    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Elapsed time since `earlier`, saturating at zero.
    #[inline]
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }

    /// This timestamp shifted forward by `delta`.
    #[inline]
    pub fn advanced_by(&self, delta: Duration) -> Self {
        Self(self.0.saturating_add(delta.as_micros() as u64))
    }
}

/// Source of frame timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Monotonic clock backed by [`Instant`], anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.epoch.elapsed().as_micros() as u64)
    }
}

/// Hand-driven clock for replays and tests.
///
/// Time only moves when [`ManualClock::advance`] or [`ManualClock::set`] is
/// called, so debounce intervals can be crossed exactly.
#[derive(Debug, Default)]
pub struct ManualClock {
    current: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta: Duration) {
        self.current.set(self.current.get().advanced_by(delta));
    }

    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_since_saturates() {
        let early = Timestamp::from_millis(100);
        let late = Timestamp::from_millis(350);
        assert_eq!(late.duration_since(early), Duration::from_millis(250));
        assert_eq!(early.duration_since(late), Duration::ZERO);
    }

    #[test]
    fn test_secs_conversion() {
        let t = Timestamp::from_millis(1_250);
        assert_eq!(t.as_micros(), 1_250_000);
        assert!((t.as_secs_f64() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_manual_clock_advances_only_on_demand() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Timestamp::ZERO);
        clock.advance(Duration::from_millis(33));
        assert_eq!(clock.now(), Timestamp::from_millis(33));
        clock.set(Timestamp::from_millis(5));
        assert_eq!(clock.now(), Timestamp::from_millis(5));
    }

    #[test]
    fn test_monotonic_clock_never_goes_backward() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
