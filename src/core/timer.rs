//! Monotonic clocks and one-shot elapsed-time gates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic instants.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock.
///
/// Clones share the same offset, so a test can keep one handle and advance
/// time while the robot owns another.
///
/// ```rust
/// use linewise::core::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// let before = clock.now();
///
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(clock.now() - before, Duration::from_millis(250));
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward for every clone of this clock.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::Relaxed))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

/// One-shot gate answering "has this much time passed since start".
///
/// A zero, negative or non-finite duration never elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    started: Instant,
    duration: Option<Duration>,
}

impl Timer {
    /// Start a timer of `secs` seconds at the clock's current instant.
    pub fn start(clock: &impl Clock, secs: f64) -> Self {
        Self::starting_at(clock.now(), secs)
    }

    /// Start a timer of `secs` seconds at `started`.
    pub fn starting_at(started: Instant, secs: f64) -> Self {
        let duration = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero());
        Self { started, duration }
    }

    /// The configured duration, `None` when the timer never elapses.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn elapsed(&self, now: Instant) -> bool {
        self.duration
            .is_some_and(|d| now.saturating_duration_since(self.started) >= d)
    }

    pub fn is_done(&self, clock: &impl Clock) -> bool {
        self.elapsed(clock.now())
    }
}
