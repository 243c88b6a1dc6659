//=========================================================================
// Clock
//=========================================================================
//
// Monotonic delta/elapsed time source for the frame loop.
//
// The clock reads an injected `TimeSource` so tests can step time by
// hand. A source that jumps backwards is clamped: `elapsed` never
// decreases and `delta` is never negative.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

//=== TimeSource ==========================================================

/// Supplies the current time as an offset from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall-clock source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven source. Clones share the same current time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get() + step);
    }

    /// Jumps to an absolute time (may go backwards).
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

//=== FrameTick ===========================================================

/// One loop iteration's timing, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTick {
    pub delta: f64,
    pub elapsed: f64,
}

//=== Clock ===============================================================

/// Produces a [`FrameTick`] per call to [`Clock::tick`].
pub struct Clock {
    source: Box<dyn TimeSource>,
    start: Duration,
    last: Option<Duration>,
}

impl Clock {
    /// Creates a clock on the wall-clock source.
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource::new())
    }

    /// Creates a clock reading `source`; construction time is "now".
    pub fn with_source<T: TimeSource + 'static>(source: T) -> Self {
        let start = source.now();
        Self {
            source: Box::new(source),
            start,
            last: None,
        }
    }

    /// Advances the clock. `delta` is zero on the first call.
    pub fn tick(&mut self) -> FrameTick {
        let floor = self.last.unwrap_or(self.start);
        let now = self.source.now().max(floor);

        let delta = match self.last {
            Some(last) => now - last,
            None => Duration::ZERO,
        };
        self.last = Some(now);

        FrameTick {
            delta: delta.as_secs_f64(),
            elapsed: (now - self.start).as_secs_f64(),
        }
    }

    /// Seconds since construction as of the last tick.
    pub fn elapsed(&self) -> f64 {
        self.last
            .map(|last| (last - self.start).as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_tick_has_zero_delta() {
        let source = ManualTimeSource::new();
        let mut clock = Clock::with_source(source.clone());

        source.advance(Duration::from_millis(250));
        let tick = clock.tick();

        assert_eq!(tick.delta, 0.0);
        assert_relative_eq!(tick.elapsed, 0.25);
    }

    #[test]
    fn delta_measures_time_between_ticks() {
        let source = ManualTimeSource::new();
        let mut clock = Clock::with_source(source.clone());

        clock.tick();
        source.advance(Duration::from_millis(16));
        let tick = clock.tick();

        assert_relative_eq!(tick.delta, 0.016, epsilon = 1e-9);
        assert_relative_eq!(tick.elapsed, 0.016, epsilon = 1e-9);
    }

    #[test]
    fn elapsed_counts_from_construction() {
        let source = ManualTimeSource::new();
        source.set(Duration::from_secs(10));
        let mut clock = Clock::with_source(source.clone());

        source.advance(Duration::from_secs(2));
        assert_relative_eq!(clock.tick().elapsed, 2.0);
        assert_relative_eq!(clock.elapsed(), 2.0);
    }

    #[test]
    fn backwards_source_is_clamped() {
        let source = ManualTimeSource::new();
        let mut clock = Clock::with_source(source.clone());

        source.set(Duration::from_secs(5));
        let before = clock.tick();

        source.set(Duration::from_secs(3));
        let after = clock.tick();

        assert_eq!(after.delta, 0.0);
        assert!(after.elapsed >= before.elapsed);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = Clock::new();
        let mut previous = clock.tick();
        for _ in 0..100 {
            let tick = clock.tick();
            assert!(tick.delta >= 0.0);
            assert!(tick.elapsed >= previous.elapsed);
            previous = tick;
        }
    }
}
