//! Fluent construction of a [`Robot`].

use super::Robot;
use crate::config::{ConfigError, DriveConfig};
use crate::control::ControlUnit;
use crate::core::{Clock, MonotonicClock};
use crate::hardware::{LineSensors, Lights, Motors, NoObstacleSensor, ObstacleSensor, StateDisplay};
use crate::navigation::{Navigator, Turn};
use thiserror::Error;

/// Errors that can occur when building a robot.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Line sensors not specified. Call .line_sensors(sensors) before .build()")]
    MissingLineSensors,

    #[error("Motors not specified. Call .motors(motors) before .build()")]
    MissingMotors,

    #[error("Lights not specified. Call .lights(lights) before .build()")]
    MissingLights,

    #[error("State display not specified. Call .display(display) before .build()")]
    MissingDisplay,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Builder for a [`Robot`].
///
/// Line sensors, motors, lights and the display are required. Without
/// further calls the robot polls no obstacle sensor, reads time from
/// [`MonotonicClock`] and uses [`DriveConfig::default`].
///
/// # Example
///
/// ```rust
/// use linewise::hardware::sim::{SimDisplay, SimLights, SimLineSensors, SimMotors};
/// use linewise::navigation::Turn;
/// use linewise::robot::RobotBuilder;
///
/// let robot = RobotBuilder::new()
///     .line_sensors(SimLineSensors::new())
///     .motors(SimMotors::new())
///     .lights(SimLights::new())
///     .display(SimDisplay::new())
///     .route([Turn::Left, Turn::Forward])
///     .build()
///     .unwrap();
///
/// assert_eq!(robot.navigator().remaining(), [Turn::Left, Turn::Forward]);
/// ```
pub struct RobotBuilder<L, M, G, D, O = NoObstacleSensor, C = MonotonicClock> {
    line_sensors: Option<L>,
    motors: Option<M>,
    lights: Option<G>,
    display: Option<D>,
    obstacle: O,
    clock: C,
    config: DriveConfig,
    route: Option<Vec<Turn>>,
}

impl<L, M, G, D> RobotBuilder<L, M, G, D> {
    pub fn new() -> Self {
        Self {
            line_sensors: None,
            motors: None,
            lights: None,
            display: None,
            obstacle: NoObstacleSensor,
            clock: MonotonicClock,
            config: DriveConfig::default(),
            route: None,
        }
    }
}

impl<L, M, G, D> Default for RobotBuilder<L, M, G, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, M, G, D, O, C> RobotBuilder<L, M, G, D, O, C> {
    pub fn line_sensors(mut self, line_sensors: L) -> Self {
        self.line_sensors = Some(line_sensors);
        self
    }

    pub fn motors(mut self, motors: M) -> Self {
        self.motors = Some(motors);
        self
    }

    pub fn lights(mut self, lights: G) -> Self {
        self.lights = Some(lights);
        self
    }

    pub fn display(mut self, display: D) -> Self {
        self.display = Some(display);
        self
    }

    /// Replace the default (absent) obstacle sensor.
    pub fn obstacle_sensor<O2>(self, obstacle: O2) -> RobotBuilder<L, M, G, D, O2, C> {
        RobotBuilder {
            line_sensors: self.line_sensors,
            motors: self.motors,
            lights: self.lights,
            display: self.display,
            obstacle,
            clock: self.clock,
            config: self.config,
            route: self.route,
        }
    }

    /// Replace the time source, e.g. with a `ManualClock` in tests.
    pub fn clock<C2>(self, clock: C2) -> RobotBuilder<L, M, G, D, O, C2> {
        RobotBuilder {
            line_sensors: self.line_sensors,
            motors: self.motors,
            lights: self.lights,
            display: self.display,
            obstacle: self.obstacle,
            clock,
            config: self.config,
            route: self.route,
        }
    }

    pub fn config(mut self, config: DriveConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the route carried by the configuration.
    pub fn route(mut self, route: impl IntoIterator<Item = Turn>) -> Self {
        self.route = Some(route.into_iter().collect());
        self
    }
}

impl<L, M, G, D, O, C> RobotBuilder<L, M, G, D, O, C>
where
    L: LineSensors,
    M: Motors,
    G: Lights,
    O: ObstacleSensor,
    D: StateDisplay,
    C: Clock,
{
    /// Validate the configuration and assemble the robot.
    pub fn build(self) -> Result<Robot<L, M, G, O, D, C>, BuildError> {
        let line_sensors = self.line_sensors.ok_or(BuildError::MissingLineSensors)?;
        let motors = self.motors.ok_or(BuildError::MissingMotors)?;
        let lights = self.lights.ok_or(BuildError::MissingLights)?;
        let display = self.display.ok_or(BuildError::MissingDisplay)?;

        let mut config = self.config;
        if let Some(route) = self.route {
            config.route = route;
        }
        config.validate()?;

        let control = ControlUnit::new(
            line_sensors,
            motors,
            lights,
            self.obstacle,
            config.speeds.clone(),
        );
        let navigator = Navigator::new(config.route.iter().copied());
        Ok(Robot::new(control, navigator, display, self.clock, config))
    }
}
