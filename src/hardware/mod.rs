//! Collaborator interfaces between the controller and the robot hardware.
//!
//! The controller only talks to hardware through the traits in this module.
//! Register-level adapters for the reference robot live in the submodules and
//! are written against `embedded-hal` traits; [`sim`] provides recording
//! in-memory implementations for tests and simulation.

mod battery;
mod lights;
mod motors;
mod sensors;
pub mod sim;

pub use battery::{AnalogInput, BatteryMonitor};
pub use lights::{
    IndicatorLights, PixelStrip, Rgb, BLINK_HALF_PERIOD_SECS, OFF, ORANGE, PIXEL_COUNT, RED,
};
pub use motors::{Direction, I2cMotors, MotorCommand, Side, MOTOR_CONTROLLER_ADDRESS};
pub use sensors::{I2cLineSensors, LineSensor, SensorSnapshot, LINE_SENSOR_ADDRESS};

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Minimum supply voltage considered healthy.
pub const MIN_BATTERY_VOLTAGE: f32 = 5.5;

/// Failures reported by hardware collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HardwareError {
    #[error("I2C transfer with device {address:#04x} failed: {kind:?}")]
    I2c { address: u8, kind: ErrorKind },

    #[error("Analog read failed: {0}")]
    Analog(String),

    #[error("Pixel strip write failed: {0}")]
    Pixels(String),

    #[error("Device unavailable: {0}")]
    Unavailable(String),
}

/// The three downward-facing line detectors.
pub trait LineSensors {
    /// Take a fresh reading of all three detectors.
    fn read(&mut self) -> Result<SensorSnapshot, HardwareError>;

    fn is_left(&mut self) -> Result<bool, HardwareError> {
        Ok(self.read()?.left)
    }

    fn is_center(&mut self) -> Result<bool, HardwareError> {
        Ok(self.read()?.center)
    }

    fn is_right(&mut self) -> Result<bool, HardwareError> {
        Ok(self.read()?.right)
    }

    fn is_intersection(&mut self) -> Result<bool, HardwareError> {
        Ok(self.read()?.is_intersection())
    }

    fn no_line(&mut self) -> Result<bool, HardwareError> {
        Ok(self.read()?.no_line())
    }
}

/// Differential drive with one motor per side.
pub trait Motors {
    /// One-time controller setup.
    fn initialize(&mut self) -> Result<(), HardwareError>;

    fn apply(&mut self, command: MotorCommand) -> Result<(), HardwareError>;

    /// Both wheels at speed zero, forward.
    fn stop(&mut self) -> Result<(), HardwareError> {
        self.apply(MotorCommand::halt(Side::Left))?;
        self.apply(MotorCommand::halt(Side::Right))
    }
}

/// Turn indicators and brake lights.
///
/// Blinking variants are expected to debounce themselves, so calling them on
/// every tick is fine.
pub trait Lights {
    fn indicate_left(&mut self) -> Result<(), HardwareError>;
    fn indicate_right(&mut self) -> Result<(), HardwareError>;
    /// Switch all indicators off.
    fn turn_off(&mut self) -> Result<(), HardwareError>;
    fn blink_all(&mut self) -> Result<(), HardwareError>;
    fn brake_on(&mut self) -> Result<(), HardwareError>;
    fn brake_off(&mut self) -> Result<(), HardwareError>;
}

/// Forward obstacle detection.
pub trait ObstacleSensor {
    fn detect(&mut self) -> bool;
}

/// Obstacle sensor for robots without one fitted; never detects anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacleSensor;

impl ObstacleSensor for NoObstacleSensor {
    fn detect(&mut self) -> bool {
        false
    }
}

/// Supply voltage source.
pub trait Battery {
    fn voltage(&mut self) -> Result<f32, HardwareError>;

    fn ok(&mut self) -> Result<bool, HardwareError> {
        Ok(self.voltage()? > MIN_BATTERY_VOLTAGE)
    }
}

/// Write-only text sink such as the on-board LED matrix.
///
/// Best-effort: implementations swallow their own failures.
pub trait StateDisplay {
    fn show(&mut self, text: &str);
}

/// Display that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl StateDisplay for NullDisplay {
    fn show(&mut self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBattery(f32);

    impl Battery for FixedBattery {
        fn voltage(&mut self) -> Result<f32, HardwareError> {
            Ok(self.0)
        }
    }

    #[test]
    fn battery_threshold_is_exclusive() {
        assert!(!FixedBattery(5.5).ok().unwrap());
        assert!(FixedBattery(5.51).ok().unwrap());
    }

    #[test]
    fn no_obstacle_sensor_never_detects() {
        let mut sensor = NoObstacleSensor;
        assert!((0..10).all(|_| !sensor.detect()));
    }

    #[test]
    fn hardware_error_formats_address_in_hex() {
        let err = HardwareError::I2c {
            address: 0x38,
            kind: ErrorKind::Bus,
        };
        assert_eq!(
            err.to_string(),
            "I2C transfer with device 0x38 failed: Bus"
        );
    }
}
