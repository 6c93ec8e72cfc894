//! Supply voltage monitoring through an ADC pin.

use super::{Battery, HardwareError};

/// Volts per ADC step after reducing the 16-bit sample to 10 bits.
const VOLTS_PER_STEP: f32 = 0.00898;

/// Raw analog input returning a 16-bit sample.
pub trait AnalogInput {
    fn read_raw(&mut self) -> Result<u16, HardwareError>;
}

/// Battery voltage read through a resistor divider on an analog pin.
pub struct BatteryMonitor<A> {
    pin: A,
}

impl<A: AnalogInput> BatteryMonitor<A> {
    pub fn new(pin: A) -> Self {
        Self { pin }
    }
}

impl<A: AnalogInput> Battery for BatteryMonitor<A> {
    fn voltage(&mut self) -> Result<f32, HardwareError> {
        let steps = self.pin.read_raw()? / 64;
        Ok(VOLTS_PER_STEP * f32::from(steps))
    }
}
