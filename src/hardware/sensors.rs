//! Line sensor snapshots and the I2C line sensor board.

use super::{HardwareError, LineSensors};
use embedded_hal::i2c::{Error as _, I2c};
use serde::{Deserialize, Serialize};

/// I2C address of the line sensor board.
pub const LINE_SENSOR_ADDRESS: u8 = 0x38;

const LEFT_BIT: u8 = 1 << 2;
const CENTER_BIT: u8 = 1 << 3;
const RIGHT_BIT: u8 = 1 << 4;

/// One of the three photodetectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSensor {
    Left,
    Center,
    Right,
}

/// Which detectors currently see the line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub left: bool,
    pub center: bool,
    pub right: bool,
}

impl SensorSnapshot {
    pub const fn new(left: bool, center: bool, right: bool) -> Self {
        Self {
            left,
            center,
            right,
        }
    }

    /// Decode the sensor board's status byte.
    ///
    /// ```rust
    /// use linewise::hardware::SensorSnapshot;
    ///
    /// let snapshot = SensorSnapshot::from_register(0b1110_1011);
    /// assert_eq!(snapshot, SensorSnapshot::new(false, true, false));
    /// ```
    pub const fn from_register(byte: u8) -> Self {
        Self::new(
            byte & LEFT_BIT != 0,
            byte & CENTER_BIT != 0,
            byte & RIGHT_BIT != 0,
        )
    }

    pub fn sees(&self, sensor: LineSensor) -> bool {
        match sensor {
            LineSensor::Left => self.left,
            LineSensor::Center => self.center,
            LineSensor::Right => self.right,
        }
    }

    /// Number of detectors that see the line.
    pub fn count(&self) -> usize {
        [self.left, self.center, self.right]
            .into_iter()
            .filter(|&seen| seen)
            .count()
    }

    /// At least two detectors see the line.
    pub fn is_intersection(&self) -> bool {
        self.count() >= 2
    }

    /// No detector sees the line.
    pub fn no_line(&self) -> bool {
        self.count() == 0
    }
}

/// Line sensor board read over I2C.
pub struct I2cLineSensors<I2C> {
    bus: I2C,
}

impl<I2C: I2c> I2cLineSensors<I2C> {
    pub fn new(bus: I2C) -> Self {
        Self { bus }
    }

    pub fn release(self) -> I2C {
        self.bus
    }
}

impl<I2C: I2c> LineSensors for I2cLineSensors<I2C> {
    fn read(&mut self) -> Result<SensorSnapshot, HardwareError> {
        let mut buffer = [0u8; 1];
        self.bus
            .read(LINE_SENSOR_ADDRESS, &mut buffer)
            .map_err(|e| HardwareError::I2c {
                address: LINE_SENSOR_ADDRESS,
                kind: e.kind(),
            })?;
        Ok(SensorSnapshot::from_register(buffer[0]))
    }
}
