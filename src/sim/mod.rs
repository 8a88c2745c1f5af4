//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Simulation-owned clock (no wall-clock reads)
//! - Stable iteration order (platform and coin declaration order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod kinematics;
pub mod platform;
pub mod progress;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{ContactReport, Face, Faces, classify, is_on_ground, overlap, resolve_contacts};
pub use kinematics::Facing;
pub use platform::{Platform, drive_platforms};
pub use progress::{countdown_tick, restart};
pub use rect::{Bounds, Rect, Size};
pub use state::{AnimState, Coin, GameEvent, GameOverCause, GamePhase, GameState, PlayerState};
pub use tick::{TickInput, tick};
