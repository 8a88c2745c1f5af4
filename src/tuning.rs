//! Data-driven game balance
//!
//! Every physics and rule constant the simulation reads lives here so a
//! level designer can retune the game from a JSON file without rebuilding.
//! Missing keys fall back to the defaults in [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Size;

/// Visible play field, supplied by the host viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Physics and rule constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Horizontal decay factor per tick with no direction held, in [0, 1]
    pub friction: f32,
    /// Vertical velocity after a jump (negative = up)
    pub jump_impulse: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    pub player_size: Size,
    pub ground_tolerance: f32,
    pub fall_margin: f32,
    pub starting_lives: u32,
    /// Moving platforms follow sin(t_ms / period)
    pub platform_period_ms: f64,
    /// Countdown used by levels that declare a zero time limit
    pub default_time_limit: u32,
    pub field: PlayField,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            jump_impulse: JUMP_IMPULSE,
            move_speed: MOVE_SPEED,
            player_size: Size::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            ground_tolerance: GROUND_TOLERANCE,
            fall_margin: FALL_MARGIN,
            starting_lives: STARTING_LIVES,
            platform_period_ms: PLATFORM_PERIOD_MS,
            default_time_limit: DEFAULT_TIME_LIMIT,
            field: PlayField::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check the ranges the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "gravity must be positive, got {}",
                self.gravity
            )));
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid(format!(
                "friction must be within [0, 1], got {}",
                self.friction
            )));
        }
        if !(self.jump_impulse < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "jump impulse must point up (negative), got {}",
                self.jump_impulse
            )));
        }
        if !self.player_size.is_valid() {
            return Err(ConfigError::Invalid("player size must be non-negative".into()));
        }
        if self.field.width < self.player_size.width || self.field.height < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "play field {}x{} cannot hold the player",
                self.field.width, self.field.height
            )));
        }
        if self.ground_tolerance < 0.0 || self.fall_margin < 0.0 {
            return Err(ConfigError::Invalid(
                "ground tolerance and fall margin must be non-negative".into(),
            ));
        }
        if !(self.platform_period_ms > 0.0) {
            return Err(ConfigError::Invalid("platform period must be positive".into()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting lives must be at least 1".into()));
        }
        if self.default_time_limit == 0 {
            return Err(ConfigError::Invalid(
                "default time limit must be at least 1 second".into(),
            ));
        }
        Ok(())
    }
}
