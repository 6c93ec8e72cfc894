//! Differential-drive motor commands and the I2C motor controller.

use super::{HardwareError, Motors};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use serde::{Deserialize, Serialize};

/// I2C address of the motor controller.
pub const MOTOR_CONTROLLER_ADDRESS: u8 = 0x70;

const INIT_SEQUENCE: [[u8; 2]; 2] = [[0x00, 0x01], [0xE8, 0xAA]];
const INIT_SETTLE_MS: u32 = 100;

/// Wheel side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Wheel rotation direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Speed and direction for one wheel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub side: Side,
    pub direction: Direction,
    pub speed: u8,
}

impl MotorCommand {
    pub const fn new(side: Side, direction: Direction, speed: u8) -> Self {
        Self {
            side,
            direction,
            speed,
        }
    }

    pub const fn forward(side: Side, speed: u8) -> Self {
        Self::new(side, Direction::Forward, speed)
    }

    pub const fn backward(side: Side, speed: u8) -> Self {
        Self::new(side, Direction::Backward, speed)
    }

    /// Canonical halt for one wheel: speed zero, forward.
    pub const fn halt(side: Side) -> Self {
        Self::forward(side, 0)
    }

    /// PWM channel pair `(on, off)` of the controller for this command.
    pub const fn channels(&self) -> (u8, u8) {
        let (forward_on, forward_off) = match self.side {
            Side::Left => (0x05, 0x04),
            Side::Right => (0x03, 0x02),
        };
        match self.direction {
            Direction::Forward => (forward_on, forward_off),
            Direction::Backward => (forward_off, forward_on),
        }
    }
}

/// Two-channel motor controller driven over I2C.
pub struct I2cMotors<I2C, D> {
    bus: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> I2cMotors<I2C, D> {
    pub fn new(bus: I2C, delay: D) -> Self {
        Self { bus, delay }
    }

    pub fn release(self) -> (I2C, D) {
        (self.bus, self.delay)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), HardwareError> {
        self.bus
            .write(MOTOR_CONTROLLER_ADDRESS, bytes)
            .map_err(|e| HardwareError::I2c {
                address: MOTOR_CONTROLLER_ADDRESS,
                kind: e.kind(),
            })
    }
}

impl<I2C: I2c, D: DelayNs> Motors for I2cMotors<I2C, D> {
    fn initialize(&mut self) -> Result<(), HardwareError> {
        for frame in INIT_SEQUENCE {
            self.write(&frame)?;
        }
        self.delay.delay_ms(INIT_SETTLE_MS);
        Ok(())
    }

    fn apply(&mut self, command: MotorCommand) -> Result<(), HardwareError> {
        let (on, off) = command.channels();
        self.write(&[off, 0])?;
        self.write(&[on, command.speed])
    }
}
