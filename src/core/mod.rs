//! Core state machine types and logic.
//!
//! This module contains the hardware-independent pieces of the controller:
//! - State definitions via the `State` trait and the robot's `DriveState`
//! - Guards that gate scheduled transitions
//! - The `StateHolder` that owns the current state and its guard
//! - Monotonic clocks and elapsed-time gates
//! - Bounded transition history

mod guard;
mod history;
mod holder;
mod state;
mod timer;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use holder::StateHolder;
pub use state::{DriveState, State};
pub use timer::{Clock, ManualClock, MonotonicClock, Timer};
