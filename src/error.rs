//! Error types for the fallible edges of the crate
//!
//! The simulation itself never fails; only loading data (tuning, levels,
//! facts) and looking up levels can.

use thiserror::Error;

use crate::catalog::Era;

/// Errors raised while loading tuning or fact tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while loading or querying the level catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed level data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level {era}/{id} is declared more than once")]
    DuplicateLevel { era: Era, id: u32 },

    #[error("level {era}/{id}: coin id `{coin_id}` is not unique")]
    DuplicateCoinId { era: Era, id: u32, coin_id: String },

    #[error("level {era}/{id}: platform {index} has a negative moving range")]
    NegativeMovingRange { era: Era, id: u32, index: usize },

    #[error("level {era}/{id}: {what} has a negative size")]
    NegativeSize { era: Era, id: u32, what: String },

    #[error("no level {era}/{id} in catalog")]
    UnknownLevel { era: Era, id: u32 },
}
