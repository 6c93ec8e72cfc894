//! State trait and the robot's drive states.
//!
//! All methods on [`State`] are pure. The holder and the drive loop only ever
//! inspect states through this trait, so the holder stays generic.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into the transition history
/// - `PartialEq`: the holder compares states to detect real changes
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: history dumps are serializable
///
/// # Example
///
/// ```rust
/// use linewise::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     On,
///     Burnt,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///             Self::Burnt => "Burnt",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Burnt)
///     }
/// }
///
/// assert_eq!(Lamp::On.label(), "On");
/// assert!(Lamp::Burnt.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for logging.
    fn name(&self) -> &str;

    /// Short token pushed to the on-board display when the state changes.
    ///
    /// Defaults to [`State::name`].
    fn label(&self) -> &str {
        self.name()
    }

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Driving modes of the line-following robot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum DriveState {
    /// Normal line following.
    #[default]
    Driving,
    /// Crossing the intersection after the brake pause.
    MoveToIntersection,
    /// Asking the navigator which way to go.
    ResolveIntersection,
    TurnLeft,
    TurnRight,
    /// Route completed.
    Finish,
    /// Short stop in front of an intersection.
    Break,
    /// Line lost for longer than the grace period.
    Error,
}

impl State for DriveState {
    fn name(&self) -> &str {
        match self {
            Self::Driving => "Driving",
            Self::MoveToIntersection => "MoveToIntersection",
            Self::ResolveIntersection => "ResolveIntersection",
            Self::TurnLeft => "TurnLeft",
            Self::TurnRight => "TurnRight",
            Self::Finish => "Finish",
            Self::Break => "Break",
            Self::Error => "Error",
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Driving => "D",
            Self::MoveToIntersection => "MTI",
            Self::ResolveIntersection => "RI",
            Self::TurnLeft => "TL",
            Self::TurnRight => "TR",
            Self::Finish => "F",
            Self::Break => "B",
            Self::Error => "E",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Finish | Self::Error)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}
