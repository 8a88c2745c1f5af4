//! Era Hopper - a side-scrolling coin-collecting platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `session`: Fixed-timestep scheduling of the simulation and countdown
//! - `catalog`: Ordered level records
//! - `facts`: Per-level fact ledger
//! - `tuning`: Data-driven game balance

pub mod catalog;
pub mod error;
pub mod facts;
pub mod session;
pub mod sim;
pub mod tuning;

pub use catalog::{Era, Level, LevelCatalog, ParseEraError};
pub use error::{CatalogError, ConfigError};
pub use facts::{FactBook, FactLedger};
pub use session::Session;
pub use tuning::{PlayField, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the per-tick constants are tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the simulation accepts before capping (seconds).
    /// Worth more than `MAX_SUBSTEPS` ticks, so long stalls hit the substep cap.
    pub const MAX_FRAME_DT: f32 = 0.25;
    /// Countdown clock period (seconds)
    pub const COUNTDOWN_PERIOD: f32 = 1.0;

    /// Vertical acceleration per tick (y grows downward)
    pub const GRAVITY: f32 = 0.5;
    /// Horizontal velocity multiplier per tick when no direction is held
    pub const FRICTION: f32 = 0.8;
    /// Vertical velocity set by a jump (negative = up)
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Horizontal speed while a direction is held
    pub const MOVE_SPEED: f32 = 3.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Proximity window for "standing on a platform"
    pub const GROUND_TOLERANCE: f32 = 5.0;
    /// Distance below the play field before the player counts as fallen
    pub const FALL_MARGIN: f32 = 100.0;

    /// Moving platform defaults
    pub const DEFAULT_MOVING_RANGE: f32 = 50.0;
    pub const PLATFORM_PERIOD_MS: f64 = 500.0;

    /// Used when a level does not declare a time limit
    pub const DEFAULT_TIME_LIMIT: u32 = 60;

    /// Visible play field
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
}
