#![forbid(unsafe_code)]

//! Frame clock.
//!
//! The host calls [`FrameClock::tick`] exactly once per displayed frame.
//! Each tick yields a [`FrameTick`] with the frame index, accumulated
//! effect time, and the elapsed time since the previous tick.
//!
//! # Invariants
//!
//! - Effect time never runs backward. A [`TimeSource`] reading that is
//!   earlier than the previous one produces `dt == 0`.
//! - `dt` is clamped to [`FrameClock::max_dt`] so a suspended tab or a
//!   debugger pause does not teleport time-driven effects.
//! - The first tick has `frame == 0` and `dt == 0`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Default upper bound on a single frame step.
pub const DEFAULT_MAX_DT: Duration = Duration::from_millis(250);

/// Monotonic time source supplied by the host.
pub trait TimeSource {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by `web_time::Instant` (works on wasm32).
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: web_time::Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced time source for tests and offline rendering.
///
/// Clones share the same underlying reading, so a test can keep a handle
/// while the clock owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the reading forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Set the reading directly (may move backward).
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl TimeSource for ManualTimeSource {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// One frame's worth of timing information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTick {
    /// Zero-based frame index.
    pub frame: u64,
    /// Accumulated effect time (sum of clamped steps).
    pub time: Duration,
    /// Step since the previous tick.
    pub dt: Duration,
}

impl FrameTick {
    /// Synthesize the tick a fixed-rate host would deliver for `frame`.
    ///
    /// `fps` values that are not positive and finite are treated as 60.
    /// Durations too large to represent saturate at `Duration::MAX`.
    pub fn at_frame(frame: u64, fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        let step = saturating_secs(1.0 / fps);
        let dt = if frame == 0 { Duration::ZERO } else { step };
        Self {
            frame,
            time: saturating_secs(frame as f64 / fps),
            dt,
        }
    }

    #[inline]
    pub fn time_seconds(&self) -> f64 {
        self.time.as_secs_f64()
    }

    #[inline]
    pub fn dt_seconds(&self) -> f64 {
        self.dt.as_secs_f64()
    }
}

#[inline]
fn saturating_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Per-effect frame clock.
#[derive(Debug, Clone)]
pub struct FrameClock<T: TimeSource = SystemTimeSource> {
    source: T,
    last: Option<Duration>,
    elapsed: Duration,
    next_frame: u64,
    max_dt: Duration,
}

impl FrameClock<SystemTimeSource> {
    /// Clock driven by wall time.
    pub fn system() -> Self {
        Self::new(SystemTimeSource::new())
    }
}

impl<T: TimeSource> FrameClock<T> {
    pub fn new(source: T) -> Self {
        Self {
            source,
            last: None,
            elapsed: Duration::ZERO,
            next_frame: 0,
            max_dt: DEFAULT_MAX_DT,
        }
    }

    /// Builder: set the per-frame step clamp.
    #[must_use]
    pub fn with_max_dt(mut self, max_dt: Duration) -> Self {
        self.max_dt = max_dt;
        self
    }

    /// Largest step a single tick may report.
    #[inline]
    pub fn max_dt(&self) -> Duration {
        self.max_dt
    }

    /// Number of ticks delivered so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.next_frame
    }

    /// Accumulated effect time.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameTick {
        let now = self.source.now();
        let dt = match self.last {
            None => Duration::ZERO,
            Some(last) => now.saturating_sub(last).min(self.max_dt),
        };
        // A backward reading must not rewind the reference point either,
        // or the next forward reading would be double counted.
        self.last = Some(self.last.map_or(now, |last| last.max(now)));
        self.elapsed = self.elapsed.saturating_add(dt);

        let tick = FrameTick {
            frame: self.next_frame,
            time: self.elapsed,
            dt,
        };
        self.next_frame += 1;
        tick
    }

    /// Restart from frame zero (e.g. when the host restarts the effect).
    pub fn reset(&mut self) {
        self.last = None;
        self.elapsed = Duration::ZERO;
        self.next_frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_tick_is_frame_zero_with_zero_dt() {
        let source = ManualTimeSource::new();
        source.set(ms(5_000));
        let mut clock = FrameClock::new(source);
        let tick = clock.tick();
        assert_eq!(tick.frame, 0);
        assert_eq!(tick.dt, Duration::ZERO);
        assert_eq!(tick.time, Duration::ZERO);
    }

    #[test]
    fn ticks_accumulate_elapsed_time() {
        let source = ManualTimeSource::new();
        let mut clock = FrameClock::new(source.clone());
        clock.tick();
        source.advance(ms(16));
        let t1 = clock.tick();
        source.advance(ms(17));
        let t2 = clock.tick();
        assert_eq!(t1.frame, 1);
        assert_eq!(t1.dt, ms(16));
        assert_eq!(t2.frame, 2);
        assert_eq!(t2.time, ms(33));
        assert_eq!(clock.frames(), 3);
    }

    #[test]
    fn backward_reading_yields_zero_dt() {
        let source = ManualTimeSource::new();
        source.set(ms(100));
        let mut clock = FrameClock::new(source.clone());
        clock.tick();
        source.set(ms(40));
        let back = clock.tick();
        assert_eq!(back.dt, Duration::ZERO);
        assert_eq!(back.time, Duration::ZERO);

        // Recovering to 116ms counts only the 16ms past the high-water mark.
        source.set(ms(116));
        let fwd = clock.tick();
        assert_eq!(fwd.dt, ms(16));
    }

    #[test]
    fn large_gaps_are_clamped() {
        let source = ManualTimeSource::new();
        let mut clock = FrameClock::new(source.clone()).with_max_dt(ms(50));
        clock.tick();
        source.advance(Duration::from_secs(30));
        let tick = clock.tick();
        assert_eq!(tick.dt, ms(50));
        assert_eq!(clock.elapsed(), ms(50));
    }

    #[test]
    fn reset_restarts_numbering() {
        let source = ManualTimeSource::new();
        let mut clock = FrameClock::new(source.clone());
        clock.tick();
        source.advance(ms(10));
        clock.tick();
        clock.reset();
        let tick = clock.tick();
        assert_eq!(tick.frame, 0);
        assert_eq!(tick.time, Duration::ZERO);
    }

    #[test]
    fn at_frame_matches_fixed_rate() {
        let tick = FrameTick::at_frame(120, 60.0);
        assert_eq!(tick.frame, 120);
        assert!((tick.time_seconds() - 2.0).abs() < 1e-9);
        assert!((tick.dt_seconds() - 1.0 / 60.0).abs() < 1e-9);
        assert_eq!(FrameTick::at_frame(0, 60.0).dt, Duration::ZERO);
    }

    #[test]
    fn at_frame_rejects_bad_fps() {
        let a = FrameTick::at_frame(60, f64::NAN);
        let b = FrameTick::at_frame(60, 60.0);
        assert_eq!(a, b);
    }

    #[test]
    fn at_frame_saturates_on_tiny_fps() {
        let tick = FrameTick::at_frame(3, 1e-300);
        assert_eq!(tick.dt, Duration::MAX);
        assert_eq!(tick.time, Duration::MAX);
        assert_eq!(FrameTick::at_frame(0, 1e-300).dt, Duration::ZERO);
        let slow = FrameTick::at_frame(u64::MAX, 1e-3);
        assert_eq!(slow.time, Duration::MAX);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = FrameClock::system();
        let mut last = clock.tick().time;
        for _ in 0..100 {
            let t = clock.tick().time;
            assert!(t >= last);
            last = t;
        }
    }
}
