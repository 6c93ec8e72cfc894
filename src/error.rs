//! Errors surfaced to whoever runs the drive loop.

use crate::hardware::HardwareError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriveError {
    #[error("Hardware fault: {0}")]
    Hardware(#[from] HardwareError),

    #[error("Battery voltage too low: {voltage:.2}V")]
    LowBattery { voltage: f32 },
}
