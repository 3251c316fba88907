//! Time sources and frame pacing state.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Frame rate used when neither the source nor the caller provides one.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// A source of time the scheduler can read and wait on.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug)]
struct ManualState {
    now: Instant,
    sleeps: Vec<Duration>,
}

/// A clock that only moves when told to.
///
/// Sleeping advances the clock instantly and records the requested duration.
/// Clones share the same time, so a fake terminal holding a clone can charge
/// simulated render cost to the scheduler's clock.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Rc<RefCell<ManualState>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ManualState {
                now: Instant::now(),
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.state.borrow_mut().now += duration;
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.borrow().now
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.now += duration;
        state.sleeps.push(duration);
    }
}

/// Pick the playback rate: the source's if usable, else the fallback, else
/// [`DEFAULT_FRAME_RATE`].
pub fn effective_frame_rate(source_rate: f64, fallback: f64) -> f64 {
    [source_rate, fallback]
        .into_iter()
        .find(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_FRAME_RATE)
}

/// Scheduler-owned timing state for one playback.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    target_interval: Duration,
    iterations: u64,
    paced: u64,
    drift: Duration,
}

impl PlaybackClock {
    /// Build a clock that paces one rendered frame every `every_nth / frame_rate` seconds.
    ///
    /// `frame_rate` must be positive; use [`effective_frame_rate`] first.
    pub fn new(frame_rate: f64, every_nth: u32) -> Self {
        let every_nth = every_nth.max(1);
        Self {
            target_interval: Duration::from_secs_f64(every_nth as f64 / frame_rate),
            iterations: 0,
            paced: 0,
            drift: Duration::ZERO,
        }
    }

    pub fn target_interval(&self) -> Duration {
        self.target_interval
    }

    /// Frames pulled from the source so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Frame slots paced so far.
    pub fn paced(&self) -> u64 {
        self.paced
    }

    /// Total time by which frame slots overran their interval.
    pub fn drift(&self) -> Duration {
        self.drift
    }

    /// Count one frame pulled from the source.
    pub fn tick(&mut self) {
        self.iterations += 1;
    }

    /// Close out a frame slot that took `elapsed` and return how long to sleep.
    ///
    /// Never negative. Overruns are added to the drift and not made up later.
    pub fn pace(&mut self, elapsed: Duration) -> Duration {
        self.paced += 1;
        match self.target_interval.checked_sub(elapsed) {
            Some(remaining) => remaining,
            None => {
                self.drift += elapsed - self.target_interval;
                Duration::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_interval_30fps() {
        let clock = PlaybackClock::new(30.0, 1);
        let ms = clock.target_interval().as_secs_f64() * 1000.0;
        assert!((ms - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_every_nth_stretches_interval() {
        let clock = PlaybackClock::new(30.0, 2);
        let ms = clock.target_interval().as_secs_f64() * 1000.0;
        assert!((ms - 66.667).abs() < 0.01);
    }

    #[test]
    fn test_every_nth_zero_treated_as_one() {
        let a = PlaybackClock::new(25.0, 0);
        let b = PlaybackClock::new(25.0, 1);
        assert_eq!(a.target_interval(), b.target_interval());
    }

    #[test]
    fn test_pace_subtracts_elapsed() {
        let mut clock = PlaybackClock::new(30.0, 1);
        let sleep = clock.pace(Duration::from_millis(10));
        let ms = sleep.as_secs_f64() * 1000.0;
        assert!((ms - 23.333).abs() < 0.01);
        assert_eq!(clock.drift(), Duration::ZERO);
        assert_eq!(clock.paced(), 1);
    }

    #[test]
    fn test_pace_overrun_accumulates_drift() {
        let mut clock = PlaybackClock::new(10.0, 1);
        assert_eq!(clock.pace(Duration::from_millis(150)), Duration::ZERO);
        assert_eq!(clock.pace(Duration::from_millis(120)), Duration::ZERO);
        assert_eq!(clock.drift(), Duration::from_millis(70));
    }

    #[test]
    fn test_effective_frame_rate() {
        assert_eq!(effective_frame_rate(24.0, 30.0), 24.0);
        assert_eq!(effective_frame_rate(0.0, 12.0), 12.0);
        assert_eq!(effective_frame_rate(f64::NAN, -1.0), DEFAULT_FRAME_RATE);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();
        other.advance(Duration::from_millis(5));
        clock.sleep(Duration::from_millis(7));
        assert_eq!(clock.now() - start, Duration::from_millis(12));
        assert_eq!(other.sleeps(), vec![Duration::from_millis(7)]);
    }
}
