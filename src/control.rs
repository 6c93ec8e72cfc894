//! Translation of drive commands into motor and light actions.

use crate::config::SteeringSpeeds;
use crate::hardware::{
    HardwareError, LineSensors, Lights, MotorCommand, Motors, ObstacleSensor, SensorSnapshot,
    Side,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Movement commands issued by the drive loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Follow the line, steering by the sensors.
    Forward,
    /// Spin left on the spot.
    Left,
    /// Spin right on the spot.
    Right,
    /// Stop and blink all indicators.
    Finish,
    /// Stop with brake lights on.
    Break,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Left => "left",
            Self::Right => "right",
            Self::Finish => "finish",
            Self::Break => "break",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown command '{0}'")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "finish" => Ok(Self::Finish),
            "break" => Ok(Self::Break),
            _ => Err(ParseCommandError(s.to_owned())),
        }
    }
}

/// Owns the sensors and actuators and turns commands into actions.
///
/// Holds no driving state of its own.
pub struct ControlUnit<L, M, G, O> {
    line_sensors: L,
    motors: M,
    lights: G,
    obstacle: O,
    speeds: SteeringSpeeds,
}

impl<L, M, G, O> ControlUnit<L, M, G, O>
where
    L: LineSensors,
    M: Motors,
    G: Lights,
    O: ObstacleSensor,
{
    pub fn new(line_sensors: L, motors: M, lights: G, obstacle: O, speeds: SteeringSpeeds) -> Self {
        Self {
            line_sensors,
            motors,
            lights,
            obstacle,
            speeds,
        }
    }

    /// One-time motor controller setup.
    pub fn initialize(&mut self) -> Result<(), HardwareError> {
        self.motors.initialize()
    }

    /// Poll the obstacle sensor.
    pub fn is_obstacle(&mut self) -> bool {
        self.obstacle.detect()
    }

    pub fn read_sensors(&mut self) -> Result<SensorSnapshot, HardwareError> {
        self.line_sensors.read()
    }

    pub fn lights_mut(&mut self) -> &mut G {
        &mut self.lights
    }

    pub fn speeds(&self) -> &SteeringSpeeds {
        &self.speeds
    }

    pub fn execute(&mut self, command: Command) -> Result<(), HardwareError> {
        log::debug!("Executing {command}");
        if command != Command::Break {
            self.lights.brake_off()?;
        }

        match command {
            Command::Forward => self.follow_line(),
            Command::Left => {
                self.lights.indicate_left()?;
                self.spin(Side::Left)
            }
            Command::Right => {
                self.lights.indicate_right()?;
                self.spin(Side::Right)
            }
            Command::Finish => {
                self.stop()?;
                self.lights.blink_all()
            }
            Command::Break => {
                self.lights.brake_on()?;
                self.stop()
            }
        }
    }

    /// Canonical halt: both wheels at speed zero, forward.
    pub fn stop(&mut self) -> Result<(), HardwareError> {
        self.motors.stop()
    }

    fn drive(&mut self, left: MotorCommand, right: MotorCommand) -> Result<(), HardwareError> {
        self.motors.apply(left)?;
        self.motors.apply(right)
    }

    /// Slow the wheel on the side the line drifted to; leave the motors
    /// alone when no detector sees the line.
    fn follow_line(&mut self) -> Result<(), HardwareError> {
        self.lights.turn_off()?;
        let snapshot = self.line_sensors.read()?;
        let drift = self.speeds.scaled(self.speeds.drift);
        let cruise = self.speeds.scaled(self.speeds.cruise);

        let (left, right) = if snapshot.left {
            (drift, cruise)
        } else if snapshot.right {
            (cruise, drift)
        } else if snapshot.center {
            (cruise, cruise)
        } else {
            return Ok(());
        };
        self.drive(
            MotorCommand::forward(Side::Left, left),
            MotorCommand::forward(Side::Right, right),
        )
    }

    /// Turn on the spot towards `towards`.
    fn spin(&mut self, towards: Side) -> Result<(), HardwareError> {
        let speed = self.speeds.scaled(self.speeds.turn);
        match towards {
            Side::Left => self.drive(
                MotorCommand::backward(Side::Left, speed),
                MotorCommand::forward(Side::Right, speed),
            ),
            Side::Right => self.drive(
                MotorCommand::forward(Side::Left, speed),
                MotorCommand::backward(Side::Right, speed),
            ),
        }
    }
}
