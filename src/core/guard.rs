//! Guards that gate scheduled state transitions.
//!
//! A guard is re-evaluated on every tick until it is satisfied. Guards are
//! plain data, so installing one never allocates and evaluating one has no
//! side effects.

use super::timer::Timer;
use crate::hardware::{LineSensor, SensorSnapshot};
use std::time::Instant;

/// Condition that releases the holder's pending transition.
///
/// # Example
///
/// ```rust
/// use linewise::core::{Guard, ManualClock, Clock, Timer};
/// use linewise::hardware::{LineSensor, SensorSnapshot};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let on_left = SensorSnapshot::new(true, false, false);
///
/// assert!(Guard::Always.check(clock.now(), &on_left));
/// assert!(!Guard::Never.check(clock.now(), &on_left));
/// assert!(Guard::SensorSeesLine(LineSensor::Left).check(clock.now(), &on_left));
///
/// let wait = Guard::Elapsed(Timer::start(&clock, 0.4));
/// assert!(!wait.check(clock.now(), &on_left));
/// clock.advance(Duration::from_millis(400));
/// assert!(wait.check(clock.now(), &on_left));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Guard {
    /// Satisfied on the next tick.
    #[default]
    Always,
    /// Never satisfied; the state is permanent.
    Never,
    /// Satisfied once the timer has elapsed.
    Elapsed(Timer),
    /// Satisfied once the given detector sees the line.
    SensorSeesLine(LineSensor),
}

impl Guard {
    pub fn check(&self, now: Instant, snapshot: &SensorSnapshot) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Elapsed(timer) => timer.elapsed(now),
            Self::SensorSeesLine(sensor) => snapshot.sees(*sensor),
        }
    }
}
