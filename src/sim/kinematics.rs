//! Per-tick kinematics
//!
//! Pure functions over velocity/position pairs. One call advances one fixed
//! tick; the per-tick constants in [`Tuning`] are expressed in units per
//! tick, and the fixed-timestep scheduler guarantees ticks happen at
//! `SIM_DT` regardless of display refresh rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Which way the player faces (and last moved)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Add gravity to vertical velocity. Applied every tick, grounded or not;
/// collision response is what cancels it on a platform.
#[inline]
pub fn apply_gravity(vel: Vec2, gravity: f32) -> Vec2 {
    Vec2::new(vel.x, vel.y + gravity)
}

/// Exponential horizontal decay (never snaps to zero)
#[inline]
pub fn apply_friction(vel: Vec2, friction: f32) -> Vec2 {
    Vec2::new(vel.x * friction, vel.y)
}

/// Replace vertical velocity with the jump impulse
#[inline]
pub fn jump(vel: Vec2, impulse: f32) -> Vec2 {
    Vec2::new(vel.x, impulse)
}

/// Unit-step Euler integration
#[inline]
pub fn integrate(pos: Vec2, vel: Vec2) -> Vec2 {
    pos + vel
}

/// Horizontal control: full speed in the held direction, friction otherwise
pub fn steer(vel: Vec2, direction: Option<Facing>, move_speed: f32, friction: f32) -> Vec2 {
    match direction {
        Some(Facing::Left) => Vec2::new(-move_speed, vel.y),
        Some(Facing::Right) => Vec2::new(move_speed, vel.y),
        None => apply_friction(vel, friction),
    }
}

/// Movement intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    /// Held horizontal direction, if any
    pub direction: Option<Facing>,
    /// Jump requested this tick
    pub jump: bool,
}

/// Result of advancing a body one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub pos: Vec2,
    pub vel: Vec2,
    /// A jump impulse was applied
    pub jumped: bool,
}

/// Advance a body one tick: gravity, jump (grounded only), steering, then
/// position.
pub fn advance(pos: Vec2, vel: Vec2, intent: Intent, grounded: bool, tuning: &Tuning) -> Motion {
    let mut vel = apply_gravity(vel, tuning.gravity);

    let jumped = grounded && intent.jump;
    if jumped {
        vel = jump(vel, tuning.jump_impulse);
    }

    let vel = steer(vel, intent.direction, tuning.move_speed, tuning.friction);

    Motion {
        pos: integrate(pos, vel),
        vel,
        jumped,
    }
}
