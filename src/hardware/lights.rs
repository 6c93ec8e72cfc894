//! Indicator and brake lights on an addressable pixel strip.

use super::{HardwareError, Lights};
use crate::config::DriveConfig;
use crate::core::{Clock, Timer};

/// Default blink half-period in seconds.
pub const BLINK_HALF_PERIOD_SECS: f64 = 0.5;

/// Number of pixels on the robot's strip.
pub const PIXEL_COUNT: usize = 8;

const LEFT_INDICATORS: [usize; 2] = [3, 6];
const RIGHT_INDICATORS: [usize; 2] = [0, 5];
const BRAKE_LIGHTS: [usize; 2] = [7, 4];

/// Pixel color as `(red, green, blue)`.
pub type Rgb = (u8, u8, u8);

pub const ORANGE: Rgb = (255, 100, 0);
pub const RED: Rgb = (100, 0, 0);
pub const OFF: Rgb = (0, 0, 0);

/// Addressable RGB pixel strip.
pub trait PixelStrip {
    /// Set one pixel; takes effect on the next [`PixelStrip::write`].
    fn set(&mut self, index: usize, color: Rgb);

    /// Push the buffered colors to the strip.
    fn write(&mut self) -> Result<(), HardwareError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlinkMode {
    Left,
    Right,
    All,
}

/// Turn indicators and brake lights with self-debounced blinking.
///
/// Blinking calls toggle the indicators at most once per half-period; calls
/// in between are no-ops, so the drive loop may call them every tick.
pub struct IndicatorLights<P, C> {
    strip: P,
    clock: C,
    half_period_secs: f64,
    gate: Option<Timer>,
    lit: bool,
}

impl<P: PixelStrip, C: Clock> IndicatorLights<P, C> {
    pub fn new(strip: P, clock: C) -> Self {
        Self::with_half_period(strip, clock, BLINK_HALF_PERIOD_SECS)
    }

    /// Blink with the half-period configured in `config`.
    pub fn from_config(strip: P, clock: C, config: &DriveConfig) -> Self {
        Self::with_half_period(strip, clock, config.blink_half_period_secs)
    }

    /// A half-period that could never elapse falls back to
    /// [`BLINK_HALF_PERIOD_SECS`].
    pub fn with_half_period(strip: P, clock: C, half_period_secs: f64) -> Self {
        let half_period_secs = if half_period_secs.is_finite() && half_period_secs > 0.0 {
            half_period_secs
        } else {
            log::warn!(
                "Blink half-period {half_period_secs}s is unusable, using {BLINK_HALF_PERIOD_SECS}s"
            );
            BLINK_HALF_PERIOD_SECS
        };
        Self {
            strip,
            clock,
            half_period_secs,
            gate: None,
            lit: false,
        }
    }

    pub fn strip(&self) -> &P {
        &self.strip
    }

    pub fn half_period_secs(&self) -> f64 {
        self.half_period_secs
    }

    fn paint(&mut self, pixels: &[usize], color: Rgb) {
        for &index in pixels {
            self.strip.set(index, color);
        }
    }

    fn show_indicators(&mut self, left: bool, right: bool) -> Result<(), HardwareError> {
        self.paint(&LEFT_INDICATORS, if left { ORANGE } else { OFF });
        self.paint(&RIGHT_INDICATORS, if right { ORANGE } else { OFF });
        self.strip.write()
    }

    fn blink(&mut self, mode: BlinkMode) -> Result<(), HardwareError> {
        if self.gate.is_some_and(|gate| !gate.is_done(&self.clock)) {
            return Ok(());
        }
        self.gate = Some(Timer::start(&self.clock, self.half_period_secs));
        self.lit = !self.lit;
        let lit = self.lit;
        match mode {
            BlinkMode::Left => self.show_indicators(lit, false),
            BlinkMode::Right => self.show_indicators(false, lit),
            BlinkMode::All => self.show_indicators(lit, lit),
        }
    }
}

impl<P: PixelStrip, C: Clock> Lights for IndicatorLights<P, C> {
    fn indicate_left(&mut self) -> Result<(), HardwareError> {
        self.blink(BlinkMode::Left)
    }

    fn indicate_right(&mut self) -> Result<(), HardwareError> {
        self.blink(BlinkMode::Right)
    }

    fn blink_all(&mut self) -> Result<(), HardwareError> {
        self.blink(BlinkMode::All)
    }

    fn turn_off(&mut self) -> Result<(), HardwareError> {
        self.lit = false;
        self.show_indicators(false, false)
    }

    fn brake_on(&mut self) -> Result<(), HardwareError> {
        self.paint(&BRAKE_LIGHTS, RED);
        self.strip.write()
    }

    fn brake_off(&mut self) -> Result<(), HardwareError> {
        self.paint(&BRAKE_LIGHTS, OFF);
        self.strip.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::hardware::sim::SimPixelStrip;
    use std::time::Duration;

    fn lights() -> (IndicatorLights<SimPixelStrip, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (IndicatorLights::new(SimPixelStrip::new(), clock.clone()), clock)
    }

    #[test]
    fn indicate_left_lights_left_pixels_only() {
        let (mut lights, _) = lights();
        lights.indicate_left().unwrap();

        let pixels = lights.strip().pixels();
        assert_eq!(pixels[3], ORANGE);
        assert_eq!(pixels[6], ORANGE);
        assert_eq!(pixels[0], OFF);
        assert_eq!(pixels[5], OFF);
    }

    #[test]
    fn blinking_is_debounced_by_half_period() {
        let (mut lights, clock) = lights();

        lights.indicate_right().unwrap();
        lights.indicate_right().unwrap();
        lights.indicate_right().unwrap();
        assert_eq!(lights.strip().writes(), 1);
        assert_eq!(lights.strip().pixels()[0], ORANGE);

        clock.advance(Duration::from_millis(500));
        lights.indicate_right().unwrap();
        assert_eq!(lights.strip().writes(), 2);
        assert_eq!(lights.strip().pixels()[0], OFF);
    }

    #[test]
    fn blink_all_toggles_every_indicator() {
        let (mut lights, clock) = lights();

        lights.blink_all().unwrap();
        let pixels = lights.strip().pixels();
        for index in [0, 3, 5, 6] {
            assert_eq!(pixels[index], ORANGE);
        }

        clock.advance(Duration::from_millis(500));
        lights.blink_all().unwrap();
        let pixels = lights.strip().pixels();
        for index in [0, 3, 5, 6] {
            assert_eq!(pixels[index], OFF);
        }
    }

    #[test]
    fn configured_half_period_sets_blink_timing() {
        let clock = ManualClock::new();
        let config = DriveConfig {
            blink_half_period_secs: 2.0,
            ..DriveConfig::default()
        };
        let mut lights = IndicatorLights::from_config(SimPixelStrip::new(), clock.clone(), &config);

        lights.indicate_left().unwrap();
        clock.advance(Duration::from_millis(500));
        lights.indicate_left().unwrap();
        clock.advance(Duration::from_millis(1_400));
        lights.indicate_left().unwrap();
        assert_eq!(lights.strip().writes(), 1);
        assert_eq!(lights.strip().pixels()[3], ORANGE);

        clock.advance(Duration::from_millis(100));
        lights.indicate_left().unwrap();
        assert_eq!(lights.strip().writes(), 2);
        assert_eq!(lights.strip().pixels()[3], OFF);
    }

    #[test]
    fn unusable_half_period_falls_back_to_default() {
        for half_period in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let clock = ManualClock::new();
            let mut lights =
                IndicatorLights::with_half_period(SimPixelStrip::new(), clock.clone(), half_period);
            assert_eq!(lights.half_period_secs(), BLINK_HALF_PERIOD_SECS);

            lights.blink_all().unwrap();
            clock.advance(Duration::from_millis(500));
            lights.blink_all().unwrap();
            assert_eq!(lights.strip().writes(), 2);
            assert_eq!(lights.strip().pixels()[0], OFF);
        }
    }

    #[test]
    fn turn_off_resets_blink_phase() {
        let (mut lights, _) = lights();
        lights.indicate_left().unwrap();
        lights.turn_off().unwrap();
        assert_eq!(lights.strip().pixels()[3], OFF);
    }

    #[test]
    fn brake_lights_are_independent_of_indicators() {
        let (mut lights, _) = lights();
        lights.indicate_left().unwrap();
        lights.brake_on().unwrap();

        let pixels = lights.strip().pixels();
        assert_eq!(pixels[7], RED);
        assert_eq!(pixels[4], RED);
        assert_eq!(pixels[3], ORANGE);

        lights.brake_off().unwrap();
        assert_eq!(lights.strip().pixels()[7], OFF);
        assert_eq!(lights.strip().pixels()[3], ORANGE);
    }
}
