use std::time::Instant;

/// Supplies elapsed seconds since the animation started.
///
/// Seconds are `f64` so that a frame step still registers after days of uptime.
pub trait ClockSource {
    fn elapsed(&self) -> f64;
}

/// Wall clock backed by a monotonic [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    /// Start counting from now.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl ClockSource for MonotonicClock {
    fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to. Used for headless runs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    elapsed: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward by `dt` seconds. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Jump to `t` seconds. Jumping backwards is allowed (it models a clock
    /// anomaly); negative or non-finite values clamp to zero.
    pub fn set(&mut self, t: f64) {
        self.elapsed = if t.is_finite() { t.max(0.0) } else { 0.0 };
    }
}

impl ClockSource for ManualClock {
    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new();
        assert_eq!(clock.elapsed(), 0.0);
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn manual_clock_ignores_bad_steps() {
        let mut clock = ManualClock::new();
        clock.advance(1.0);
        clock.advance(-3.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.elapsed(), 1.0);
    }

    #[test]
    fn manual_clock_set_clamps() {
        let mut clock = ManualClock::new();
        clock.set(4.0);
        clock.set(2.0);
        assert_eq!(clock.elapsed(), 2.0);
        clock.set(-1.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn manual_clock_keeps_advancing_after_days() {
        let mut clock = ManualClock::new();
        clock.set(600_000.0);
        let mut last = clock.elapsed();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
            assert!(clock.elapsed() > last);
            last = clock.elapsed();
        }
        assert!((clock.elapsed() - 600_001.0).abs() < 1e-6);
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::start();
        let mut last = clock.elapsed();
        assert!(last >= 0.0);
        for _ in 0..1000 {
            let now = clock.elapsed();
            assert!(now >= last);
            last = now;
        }
    }
}
