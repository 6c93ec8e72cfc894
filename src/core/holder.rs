//! Mutable state cell with a guarded, scheduled fallback transition.

use super::guard::Guard;
use super::history::{StateHistory, StateTransition};
use super::state::State;
use crate::hardware::{NullDisplay, SensorSnapshot, StateDisplay};
use chrono::Utc;
use std::time::Instant;

/// Holds the current state, the guard installed with it and the state to
/// fall back to once that guard is satisfied.
///
/// A guard installed by [`StateHolder::set_state`] is first evaluated by the
/// following [`StateHolder::tick`], never at installation time.
///
/// # Example
///
/// ```rust
/// use linewise::core::{DriveState, Guard, StateHolder};
/// use linewise::hardware::{LineSensor, SensorSnapshot};
/// use std::time::Instant;
///
/// let mut holder = StateHolder::new(DriveState::Driving);
/// holder.set_state(
///     DriveState::TurnLeft,
///     Guard::SensorSeesLine(LineSensor::Left),
///     Some(DriveState::Driving),
/// );
///
/// let now = Instant::now();
/// holder.tick(now, &SensorSnapshot::new(false, true, false));
/// assert_eq!(holder.current(), &DriveState::TurnLeft);
///
/// holder.tick(now, &SensorSnapshot::new(true, false, false));
/// assert_eq!(holder.current(), &DriveState::Driving);
/// ```
pub struct StateHolder<S: State, D = NullDisplay> {
    current: S,
    default_state: S,
    guard: Guard,
    pending: Option<S>,
    display: D,
    history: StateHistory<S>,
    ticks: u64,
}

impl<S: State> StateHolder<S> {
    /// Create a holder whose initial and default state are both `initial`.
    pub fn new(initial: S) -> Self {
        Self::with_display(initial, NullDisplay)
    }
}

impl<S: State, D: StateDisplay> StateHolder<S, D> {
    /// Create a holder that pushes state labels to `display`.
    ///
    /// The initial label is shown immediately.
    pub fn with_display(initial: S, mut display: D) -> Self {
        display.show(initial.label());
        Self {
            default_state: initial.clone(),
            current: initial,
            guard: Guard::Always,
            pending: None,
            display,
            history: StateHistory::new(),
            ticks: 0,
        }
    }

    /// Replace the history, e.g. to apply a configured size limit.
    pub fn with_history(mut self, history: StateHistory<S>) -> Self {
        self.history = history;
        self
    }

    /// Override the state used when a satisfied guard has no pending state.
    pub fn with_default(mut self, default_state: S) -> Self {
        self.default_state = default_state;
        self
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    pub fn default_state(&self) -> &S {
        &self.default_state
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// State entered once the current guard is satisfied.
    pub fn pending(&self) -> Option<&S> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Number of ticks evaluated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Enter `state` until the next tick, then fall back to the default.
    pub fn set(&mut self, state: S) {
        self.set_state(state, Guard::Always, None);
    }

    /// Replace state, guard and pending state in one step.
    ///
    /// Re-entering the current state still re-arms the guard; only real
    /// changes are displayed, logged and recorded.
    pub fn set_state(&mut self, state: S, guard: Guard, next: Option<S>) {
        if state != self.current {
            log::info!(
                "State changed from {} to {}",
                self.current.name(),
                state.name()
            );
            self.display.show(state.label());
            self.history.record(StateTransition {
                from: self.current.clone(),
                to: state.clone(),
                timestamp: Utc::now(),
                tick: self.ticks,
            });
        }
        self.current = state;
        self.guard = guard;
        self.pending = next;
    }

    /// Evaluate the guard and apply the scheduled transition if it holds.
    ///
    /// Returns the state entered, or `None` when the guard is not satisfied.
    pub fn tick(&mut self, now: Instant, snapshot: &SensorSnapshot) -> Option<&S> {
        self.ticks += 1;
        if !self.guard.check(now, snapshot) {
            return None;
        }
        let next = self
            .pending
            .take()
            .unwrap_or_else(|| self.default_state.clone());
        self.set_state(next, Guard::Always, None);
        Some(&self.current)
    }
}
