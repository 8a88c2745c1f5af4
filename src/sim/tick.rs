//! Fixed timestep simulation tick
//!
//! Core game loop that advances one level run deterministically.

use super::collision::{is_on_ground, overlap, resolve_contacts};
use super::kinematics::{self, Facing, Intent};
use super::platform::drive_platforms;
use super::progress::{check_completion, lose_life};
use super::rect::Bounds;
use super::state::{AnimState, GameEvent, GameState};
use crate::tuning::Tuning;

/// Key snapshot for a single tick (debounced by the host)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    /// Reserved, no gameplay effect
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Space bar
    pub jump: bool,
}

impl TickInput {
    /// Up and space both mean jump
    #[inline]
    pub fn wants_jump(&self) -> bool {
        self.jump || self.up
    }

    /// Held horizontal direction; left wins when both are held
    pub fn direction(&self) -> Option<Facing> {
        if self.left {
            Some(Facing::Left)
        } else if self.right {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

/// Advance the game state by one fixed timestep of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    // Terminal phases freeze the run entirely
    if state.is_terminal() {
        return;
    }

    state.time_ticks += 1;

    // Ground check before moving: gates the jump
    let body = state.player.bounds();
    let mut on_ground = state
        .platforms
        .iter()
        .any(|p| is_on_ground(&body, &p.bounds(), tuning.ground_tolerance));

    // Integrate
    let direction = input.direction();
    let intent = Intent {
        direction,
        jump: input.wants_jump(),
    };
    let motion = kinematics::advance(state.player.pos, state.player.vel, intent, on_ground, tuning);
    if motion.jumped {
        on_ground = false;
        state.emit(GameEvent::Jump);
    }
    if let Some(facing) = direction {
        state.player.facing = facing;
    }
    let mut pos = motion.pos;
    let mut vel = motion.vel;

    // Keep inside the visible field horizontally; falling out the bottom is
    // handled below
    let max_x = (tuning.field.width - state.player.size.width).max(0.0);
    pos.x = pos.x.clamp(0.0, max_x);

    // Platforms
    let report = resolve_contacts(&mut pos, &mut vel, state.player.size, &state.platforms);
    if report.landed {
        on_ground = true;
    }
    state.player.pos = pos;
    state.player.vel = vel;
    state.player.on_ground = on_ground;

    // Coins
    let body = state.player.bounds();
    let picked: Vec<String> = state
        .coins
        .iter()
        .filter(|c| !state.collected_coin_ids.contains(&c.id) && overlap(&body, &c.bounds()))
        .map(|c| c.id.clone())
        .collect();
    for coin_id in picked {
        log::debug!("Picked up coin {}", coin_id);
        state.collected_coin_ids.insert(coin_id.clone());
        state.emit(GameEvent::Pickup { coin_id });
    }

    // Fell out of the field
    if state.player.pos.y > tuning.field.height + tuning.fall_margin {
        let start = state.player_start;
        state.player.respawn(start);
        state.emit(GameEvent::Hit);
        lose_life(state);
    }

    state.player.anim = if !state.player.on_ground {
        AnimState::Jump
    } else if direction.is_some() {
        AnimState::Run
    } else {
        AnimState::Idle
    };

    check_completion(state);

    // Moving platforms follow the simulation clock
    state.sim_time_ms += f64::from(dt) * 1000.0;
    drive_platforms(&mut state.platforms, state.sim_time_ms, tuning.platform_period_ms);
}
