//! Platforms and the moving-platform driver
//!
//! Moving platforms oscillate horizontally around the x they were loaded
//! at. Phase comes from the simulation clock owned by the game state, so
//! two runs fed the same inputs put every platform in the same place.

use serde::{Deserialize, Serialize};

use super::rect::{Bounds, Rect};
use crate::consts::DEFAULT_MOVING_RANGE;

/// A solid rectangle the player can stand on and bump into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlatformDef")]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Oscillates horizontally around `original_x`
    pub moving: bool,
    /// Oscillation amplitude (>= 0)
    pub moving_range: f32,
    /// Oscillation anchor, fixed at load
    pub original_x: f32,
    /// Gameplay/cosmetic marker, no effect on physics
    pub special: bool,
}

/// On-disk shape: `moving_range` and `original_x` are optional
#[derive(Deserialize)]
struct PlatformDef {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default)]
    moving: bool,
    #[serde(default = "default_moving_range")]
    moving_range: f32,
    #[serde(default)]
    original_x: Option<f32>,
    #[serde(default)]
    special: bool,
}

fn default_moving_range() -> f32 {
    DEFAULT_MOVING_RANGE
}

impl From<PlatformDef> for Platform {
    fn from(def: PlatformDef) -> Self {
        Self {
            x: def.x,
            y: def.y,
            width: def.width,
            height: def.height,
            moving: def.moving,
            moving_range: def.moving_range,
            original_x: def.original_x.unwrap_or(def.x),
            special: def.special,
        }
    }
}

impl Platform {
    /// A static platform
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            moving: false,
            moving_range: DEFAULT_MOVING_RANGE,
            original_x: x,
            special: false,
        }
    }

    /// A platform oscillating `range` units either side of `x`
    pub fn moving(x: f32, y: f32, width: f32, height: f32, range: f32) -> Self {
        Self {
            moving: true,
            moving_range: range,
            ..Self::new(x, y, width, height)
        }
    }

    /// Recompute x for simulation time `t_ms`. Static platforms never move.
    pub fn oscillate(&mut self, t_ms: f64, period_ms: f64) {
        if self.moving {
            let phase = (t_ms / period_ms).sin() as f32;
            self.x = self.original_x + phase * self.moving_range;
        }
    }
}

impl Bounds for Platform {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Reposition every moving platform for simulation time `t_ms`
pub fn drive_platforms(platforms: &mut [Platform], t_ms: f64, period_ms: f64) {
    for platform in platforms.iter_mut() {
        platform.oscillate(t_ms, period_ms);
    }
}
