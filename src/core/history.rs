//! State transition history tracking.
//!
//! The holder appends one record per actual state change. The history is
//! bounded: once full, the oldest records are dropped so a long run never
//! grows memory without limit.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions kept by a [`StateHistory`].
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use linewise::core::{DriveState, StateTransition};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: DriveState::Driving,
///     to: DriveState::Break,
///     timestamp: Utc::now(),
///     tick: 42,
/// };
/// assert_eq!(transition.tick, 42);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Wall-clock time of the change, for diagnostics dumps
    pub timestamp: DateTime<Utc>,
    /// Holder tick counter when the change happened
    pub tick: u64,
}

/// Ordered, bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use linewise::core::{DriveState, StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
///
/// history.record(StateTransition {
///     from: DriveState::Driving,
///     to: DriveState::Break,
///     timestamp: Utc::now(),
///     tick: 1,
/// });
/// history.record(StateTransition {
///     from: DriveState::Break,
///     to: DriveState::MoveToIntersection,
///     timestamp: Utc::now(),
///     tick: 26,
/// });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Driving -> Break -> MoveToIntersection
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history holding up to [`DEFAULT_HISTORY_LIMIT`] records.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history holding up to `limit` records.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Append a transition, dropping the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest kept transition followed by the
    /// `to` state of every transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Wall-clock time between the oldest and newest kept transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
