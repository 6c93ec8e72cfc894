//! Linewise: the decision core of an autonomous line-following robot
//!
//! The robot follows a dark line with three reflectance detectors, stops
//! briefly at every intersection, crosses it and then takes the next turn of
//! a pre-programmed route. Everything is driven by a periodic tick; the
//! controller never blocks or sleeps.
//!
//! # Core Concepts
//!
//! - **State**: `DriveState` names what the robot is doing via the `State` trait
//! - **Guards**: conditions that release a scheduled transition
//! - **Holder**: the current state plus its guard and pending follow-up
//! - **Navigator**: the route, handed out one decision per intersection
//! - **Control unit**: turns commands into motor and light actions
//! - **Hardware**: collaborator traits with `embedded-hal` adapters and sims
//!
//! # Example
//!
//! ```rust
//! use linewise::core::{DriveState, ManualClock};
//! use linewise::hardware::sim::{SimDisplay, SimLights, SimLineSensors, SimMotors};
//! use linewise::hardware::SensorSnapshot;
//! use linewise::navigation::Turn;
//! use linewise::robot::RobotBuilder;
//! use std::time::Duration;
//!
//! let sensors = SimLineSensors::new();
//! let clock = ManualClock::new();
//! let mut robot = RobotBuilder::new()
//!     .line_sensors(sensors.clone())
//!     .motors(SimMotors::new())
//!     .lights(SimLights::new())
//!     .display(SimDisplay::new())
//!     .clock(clock.clone())
//!     .route([Turn::Left])
//!     .build()?;
//!
//! // Every detector sees the line: an intersection.
//! sensors.set(SensorSnapshot::new(true, true, true));
//! robot.drive()?;
//! assert_eq!(robot.state(), DriveState::Break);
//!
//! clock.advance(Duration::from_millis(500));
//! robot.drive()?;
//! assert_eq!(robot.state(), DriveState::Driving);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod control;
pub mod core;
pub mod error;
pub mod hardware;
pub mod navigation;
pub mod robot;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigError, DriveConfig, SteeringSpeeds};
pub use control::{Command, ControlUnit};
pub use core::{DriveState, Guard, State, StateHistory, StateHolder, StateTransition};
pub use error::DriveError;
pub use hardware::HardwareError;
pub use navigation::{Navigator, Turn};
pub use robot::{BuildError, Robot, RobotBuilder, Tick};
