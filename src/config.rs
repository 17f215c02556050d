//! Gameplay configuration
//!
//! Everything has a fixed default from `consts`; embedders and tests can
//! override fields, but every config is validated before a world is built
//! from it.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay configuration for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Playfield width in field units
    pub field_width: f32,
    /// Playfield height in field units
    pub field_height: f32,
    /// Tick interval in milliseconds (pacing and the default time limit)
    pub tick_ms: u64,
    /// Round length in ticks
    pub time_limit_ticks: u64,

    /// How many targets to place at setup
    pub target_count: usize,
    /// Target rectangle size
    pub target_size: Vec2,
    /// Lower bound of the per-target speed draw
    pub target_speed_min: f32,
    /// Upper bound (exclusive) of the per-target speed draw
    pub target_speed_max: f32,

    /// Blocker rectangle size
    pub blocker_size: Vec2,
    /// Blocker bounce speed per tick
    pub blocker_speed: f32,

    /// Cannon mount body size
    pub cannon_size: Vec2,
    /// Barrel length, carried for the presentation layer
    pub barrel_length: f32,

    /// Cannonball radius
    pub cannonball_radius: f32,
    /// Cannonball travel per tick
    pub cannonball_step: f32,

    /// Minimum separation between placed targets (and the blocker)
    pub spawn_margin: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            tick_ms: TICK_MS,
            time_limit_ticks: ROUND_MS / TICK_MS,
            target_count: TARGET_COUNT,
            target_size: Vec2::new(TARGET_WIDTH, TARGET_HEIGHT),
            target_speed_min: TARGET_SPEED_MIN,
            target_speed_max: TARGET_SPEED_MAX,
            blocker_size: Vec2::new(BLOCKER_WIDTH, BLOCKER_HEIGHT),
            blocker_speed: BLOCKER_SPEED,
            cannon_size: Vec2::new(CANNON_WIDTH, CANNON_HEIGHT),
            barrel_length: BARREL_LENGTH,
            cannonball_radius: CANNONBALL_RADIUS,
            cannonball_step: CANNONBALL_STEP,
            spawn_margin: SPAWN_MARGIN,
        }
    }
}

impl GameConfig {
    /// Playfield size as a vector
    #[inline]
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// Check every field before any world is built from this config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width.is_finite() && self.field_width > 0.0)
            || !(self.field_height.is_finite() && self.field_height > 0.0)
        {
            return Err(ConfigError::InvalidField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Self::check_size("target", self.target_size)?;
        Self::check_size("blocker", self.blocker_size)?;
        Self::check_size("cannon", self.cannon_size)?;
        Self::check_positive("barrel length", self.barrel_length)?;
        Self::check_positive("cannonball radius", self.cannonball_radius)?;
        Self::check_positive("cannonball step", self.cannonball_step)?;
        Self::check_speed("blocker speed", self.blocker_speed)?;
        Self::check_speed("target speed minimum", self.target_speed_min)?;
        if !(self.target_speed_max.is_finite() && self.target_speed_max > self.target_speed_min) {
            return Err(ConfigError::EmptySpeedRange {
                min: self.target_speed_min,
                max: self.target_speed_max,
            });
        }
        if !(self.spawn_margin.is_finite() && self.spawn_margin >= 0.0) {
            return Err(ConfigError::InvalidValue {
                what: "spawn margin",
                value: self.spawn_margin,
            });
        }
        Ok(())
    }

    fn check_size(what: &'static str, size: Vec2) -> Result<(), ConfigError> {
        if size.x.is_finite() && size.x > 0.0 && size.y.is_finite() && size.y > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidSize { what, size })
        }
    }

    fn check_positive(what: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue { what, value })
        }
    }

    fn check_speed(what: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue { what, value })
        }
    }
}

/// A config field that cannot produce a playable round
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Playfield dimensions must be positive and finite
    InvalidField { width: f32, height: f32 },
    /// Tick pacing needs a nonzero interval
    ZeroTickInterval,
    /// Body sizes must have positive, finite components
    InvalidSize { what: &'static str, size: Vec2 },
    /// Scalar must be positive (or non-negative, for speeds) and finite
    InvalidValue { what: &'static str, value: f32 },
    /// The target speed draw [min, max) must be non-empty
    EmptySpeedRange { min: f32, max: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidField { width, height } => {
                write!(f, "invalid playfield dimensions {width}x{height}")
            }
            ConfigError::ZeroTickInterval => write!(f, "tick interval must be nonzero"),
            ConfigError::InvalidSize { what, size } => {
                write!(f, "invalid {what} size {}x{}", size.x, size.y)
            }
            ConfigError::InvalidValue { what, value } => {
                write!(f, "invalid {what}: {value}")
            }
            ConfigError::EmptySpeedRange { min, max } => {
                write!(f, "target speed range [{min}, {max}) is empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn default_time_limit_spans_the_round() {
        let config = GameConfig::default();
        // 10 s at 16 ms per tick
        assert_eq!(config.time_limit_ticks, 625);
    }

    #[test]
    fn rejects_negative_blocker_speed() {
        let config = GameConfig {
            blocker_speed: -1.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { what: "blocker speed", .. })
        ));
    }

    #[test]
    fn rejects_empty_speed_range() {
        let config = GameConfig {
            target_speed_min: 2.5,
            target_speed_max: 2.5,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptySpeedRange { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_field() {
        let config = GameConfig {
            field_width: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField { .. })
        ));
    }

    #[test]
    fn zero_target_count_is_allowed() {
        let config = GameConfig {
            target_count: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
