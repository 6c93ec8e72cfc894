//! Tunable constants of the drive loop.
//!
//! Every field has a default matching the reference robot, so a JSON file
//! only needs to name what it changes:
//!
//! ```rust
//! use linewise::config::DriveConfig;
//! use linewise::navigation::Turn;
//!
//! let config = DriveConfig::from_json(r#"{
//!     "lost_line_grace_secs": 3.0,
//!     "speeds": { "turn": 90 },
//!     "route": ["left", "forward"]
//! }"#).unwrap();
//!
//! assert_eq!(config.lost_line_grace_secs, 3.0);
//! assert_eq!(config.speeds.turn, 90);
//! assert_eq!(config.speeds.cruise, 90);
//! assert_eq!(config.route, [Turn::Left, Turn::Forward]);
//! ```

use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::navigation::Turn;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a [`DriveConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("'{field}' must be a positive, finite number of seconds (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },

    #[error("Speed multiplier must be positive and finite (got {0})")]
    InvalidMultiplier(f32),

    #[error("Drift speed {drift} must not exceed cruise speed {cruise}")]
    DriftAboveCruise { drift: u8, cruise: u8 },
}

/// Wheel speeds per steering case, on the controller's 0–255 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringSpeeds {
    /// Wheel on the side the line drifted towards.
    pub drift: u8,
    /// Straight-line speed and the outer wheel while correcting.
    pub cruise: u8,
    /// Both wheels while spinning on the spot at an intersection.
    pub turn: u8,
    /// Global scale applied to every speed above.
    pub multiplier: f32,
}

impl Default for SteeringSpeeds {
    fn default() -> Self {
        Self {
            drift: 30,
            cruise: 90,
            turn: 110,
            multiplier: 1.0,
        }
    }
}

impl SteeringSpeeds {
    /// Apply the multiplier, saturating to the controller's range.
    pub fn scaled(&self, base: u8) -> u8 {
        (f32::from(base) * self.multiplier).clamp(0.0, 255.0) as u8
    }
}

/// Timings, speeds and route of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Pause in front of an intersection before crossing it.
    pub brake_secs: f64,
    /// Straight driving time needed to put the wheels over the intersection.
    pub crossing_secs: f64,
    /// How long the line may be lost before the run is aborted.
    pub lost_line_grace_secs: f64,
    /// Indicator blink half-period.
    pub blink_half_period_secs: f64,
    /// Drive loop cadence.
    pub tick_period_ms: u64,
    pub speeds: SteeringSpeeds,
    /// One decision per intersection, in order.
    pub route: Vec<Turn>,
    /// Number of state changes kept for diagnostics.
    pub history_limit: usize,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            brake_secs: 0.5,
            crossing_secs: 0.4,
            lost_line_grace_secs: 5.0,
            blink_half_period_secs: 0.5,
            tick_period_ms: 20,
            speeds: SteeringSpeeds::default(),
            route: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl DriveConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_route(mut self, route: impl IntoIterator<Item = Turn>) -> Self {
        self.route = route.into_iter().collect();
        self
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Check that every timed gate can actually elapse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("brake_secs", self.brake_secs),
            ("crossing_secs", self.crossing_secs),
            ("lost_line_grace_secs", self.lost_line_grace_secs),
            ("blink_half_period_secs", self.blink_half_period_secs),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }

        let speeds = &self.speeds;
        if !(speeds.multiplier.is_finite() && speeds.multiplier > 0.0) {
            return Err(ConfigError::InvalidMultiplier(speeds.multiplier));
        }
        if speeds.drift > speeds.cruise {
            return Err(ConfigError::DriftAboveCruise {
                drift: speeds.drift,
                cruise: speeds.cruise,
            });
        }
        Ok(())
    }
}
