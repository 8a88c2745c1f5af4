//! Game state and core simulation types
//!
//! Everything one level run mutates lives in [`GameState`]. It is built
//! fresh from an immutable [`Level`] at start/restart and thrown away when
//! the run ends; it is serializable for inspection and tests, never saved.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kinematics::Facing;
use super::platform::Platform;
use super::rect::{Bounds, Rect, Size};
use crate::catalog::Level;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every coin collected (terminal)
    LevelComplete,
    /// Out of lives or time (terminal)
    GameOver(GameOverCause),
}

/// Why a run ended in failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    OutOfLives,
    OutOfTime,
}

/// Animation state derived each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Run,
    Jump,
}

/// Notifications for audio/feedback collaborators (fire-and-forget)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player left the ground under a jump impulse
    Jump,
    /// A coin was collected
    Pickup { coin_id: String },
    /// Player fell out of the play field and lost a life
    Hit,
    LevelComplete,
    GameOver(GameOverCause),
}

/// A collectible coin (square bounding box)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Coin {
    pub fn new(id: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            size,
        }
    }
}

impl Bounds for Coin {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(Vec2::new(self.x, self.y), Size::square(self.size))
    }
}

/// The player body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Size,
    pub facing: Facing,
    pub on_ground: bool,
    pub anim: AnimState,
}

impl PlayerState {
    pub fn new(pos: Vec2, size: Size) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            facing: Facing::Right,
            on_ground: false,
            anim: AnimState::Idle,
        }
    }

    /// Put the player back at `start` at rest
    pub fn respawn(&mut self, start: Vec2) {
        self.pos = start;
        self.vel = Vec2::ZERO;
    }
}

impl Bounds for PlayerState {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Complete state of one level run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: PlayerState,
    /// Respawn point after a fall
    pub player_start: Vec2,
    /// Per-run copy of the level's platforms (moving ones are mutated)
    pub platforms: Vec<Platform>,
    /// Per-run copy of the level's coins
    pub coins: Vec<Coin>,
    /// Ids of coins collected so far (subset of `coins`)
    pub collected_coin_ids: BTreeSet<String>,
    pub lives: u32,
    /// Countdown in whole seconds
    pub time_remaining: u32,
    pub phase: GamePhase,
    /// Accumulated simulation time, drives moving platforms
    pub sim_time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a fresh run of `level`
    pub fn new(level: &Level, tuning: &Tuning) -> Self {
        let time_limit = if level.time_limit == 0 {
            tuning.default_time_limit
        } else {
            level.time_limit
        };

        Self {
            player: PlayerState::new(level.player_start, tuning.player_size),
            player_start: level.player_start,
            platforms: level.platforms.clone(),
            coins: level.coins.clone(),
            collected_coin_ids: BTreeSet::new(),
            lives: tuning.starting_lives,
            time_remaining: time_limit,
            phase: GamePhase::Playing,
            sim_time_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    #[inline]
    pub fn is_level_complete(&self) -> bool {
        self.phase == GamePhase::LevelComplete
    }

    /// Either terminal phase
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.is_playing()
    }

    pub fn is_collected(&self, coin_id: &str) -> bool {
        self.collected_coin_ids.contains(coin_id)
    }

    pub fn coins_collected(&self) -> usize {
        self.collected_coin_ids.len()
    }

    pub fn all_coins_collected(&self) -> bool {
        self.collected_coin_ids.len() == self.coins.len()
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
