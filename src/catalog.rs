//! Level catalog
//!
//! An ordered list of level records keyed by `(era, id)`. Order matters:
//! progression goes to the next record in the list, across eras.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::sim::{Coin, Platform, Size};

/// Built-in level data
const BUILTIN_LEVELS: &str = include_str!("../assets/levels.json");

/// Level theme; affects visuals and facts only, never physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    Old,
    Current,
    Future,
}

impl Era {
    pub const ALL: [Era; 3] = [Era::Old, Era::Current, Era::Future];

    pub fn as_str(&self) -> &'static str {
        match self {
            Era::Old => "old",
            Era::Current => "current",
            Era::Future => "future",
        }
    }
}

/// Raised when a string names no era
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown era `{0}` (expected old, current or future)")]
pub struct ParseEraError(String);

impl FromStr for Era {
    type Err = ParseEraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "old" => Ok(Era::Old),
            "current" | "now" => Ok(Era::Current),
            "future" => Ok(Era::Future),
            _ => Err(ParseEraError(s.to_string())),
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A static level record. Never mutated once loaded; runs copy what they need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub era: Era,
    #[serde(default)]
    pub description: String,
    pub player_start: Vec2,
    /// Countdown in seconds (0 = use the tuning default)
    #[serde(default)]
    pub time_limit: u32,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    /// Display count; completion always uses `coins.len()`
    pub total_coins: u32,
}

impl Level {
    /// Navigation route for this level
    pub fn route(&self) -> String {
        format!("/play/{}/{}", self.era, self.id)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), CatalogError> {
        let (era, id) = (self.era, self.id);

        let mut seen = HashSet::new();
        for coin in &self.coins {
            if !seen.insert(coin.id.as_str()) {
                return Err(CatalogError::DuplicateCoinId {
                    era,
                    id,
                    coin_id: coin.id.clone(),
                });
            }
            if coin.size < 0.0 {
                return Err(CatalogError::NegativeSize {
                    era,
                    id,
                    what: format!("coin `{}`", coin.id),
                });
            }
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            if platform.moving_range < 0.0 {
                return Err(CatalogError::NegativeMovingRange { era, id, index });
            }
            if !Size::new(platform.width, platform.height).is_valid() {
                return Err(CatalogError::NegativeSize {
                    era,
                    id,
                    what: format!("platform {index}"),
                });
            }
        }

        if self.total_coins as usize != self.coins.len() {
            log::warn!(
                "Level {}/{} declares {} coins but places {}",
                era,
                id,
                self.total_coins,
                self.coins.len()
            );
        }

        Ok(())
    }
}

/// Ordered, validated level records
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Build a catalog from levels in progression order
    pub fn new(levels: Vec<Level>) -> Result<Self, CatalogError> {
        let mut keys = HashSet::new();
        for level in &levels {
            if !keys.insert((level.era, level.id)) {
                return Err(CatalogError::DuplicateLevel {
                    era: level.era,
                    id: level.id,
                });
            }
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of levels
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// The levels shipped with the game
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Self::from_json(BUILTIN_LEVELS)?;
        log::info!("Loaded {} built-in levels", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn first(&self) -> Option<&Level> {
        self.levels.first()
    }

    pub fn get(&self, era: Era, id: u32) -> Option<&Level> {
        self.levels.iter().find(|l| l.era == era && l.id == id)
    }

    /// Like [`Self::get`], but a missing level is an error
    pub fn require(&self, era: Era, id: u32) -> Result<&Level, CatalogError> {
        self.get(era, id)
            .ok_or(CatalogError::UnknownLevel { era, id })
    }

    /// Levels of one era, in catalog order
    pub fn levels_in(&self, era: Era) -> impl Iterator<Item = &Level> {
        self.levels.iter().filter(move |l| l.era == era)
    }

    /// The level after `(era, id)` in catalog order, `None` at the end or
    /// when `(era, id)` isn't in the catalog
    pub fn next_after(&self, era: Era, id: u32) -> Option<&Level> {
        let index = self.levels.iter().position(|l| l.era == era && l.id == id)?;
        self.levels.get(index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(era: Era, id: u32) -> Level {
        Level {
            id,
            era,
            description: String::new(),
            player_start: Vec2::ZERO,
            time_limit: 30,
            platforms: vec![Platform::new(0.0, 500.0, 800.0, 100.0)],
            coins: vec![Coin::new(format!("{era}-{id}"), 100.0, 450.0, 20.0)],
            total_coins: 1,
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = LevelCatalog::builtin().expect("built-in levels are valid");
        assert_eq!(catalog.len(), 6);
        for era in Era::ALL {
            assert_eq!(catalog.levels_in(era).count(), 2);
        }
        for level in catalog.levels() {
            assert_eq!(level.total_coins as usize, level.coins.len());
            assert!(level.time_limit > 0);
        }
    }

    #[test]
    fn test_builtin_moving_platforms_anchor_at_x() {
        let catalog = LevelCatalog::builtin().unwrap();
        let level = catalog.get(Era::Future, 2).unwrap();
        let moving: Vec<_> = level.platforms.iter().filter(|p| p.moving).collect();
        assert_eq!(moving.len(), 3);
        assert!(moving.iter().all(|p| p.original_x == p.x));
    }

    #[test]
    fn test_next_after_follows_catalog_order() {
        let catalog = LevelCatalog::new(vec![
            level(Era::Old, 1),
            level(Era::Old, 2),
            level(Era::Current, 1),
        ])
        .unwrap();

        assert_eq!(catalog.next_after(Era::Old, 1).map(|l| (l.era, l.id)), Some((Era::Old, 2)));
        assert_eq!(
            catalog.next_after(Era::Old, 2).map(|l| (l.era, l.id)),
            Some((Era::Current, 1))
        );
        assert!(catalog.next_after(Era::Current, 1).is_none());
        assert!(catalog.next_after(Era::Future, 9).is_none());
    }

    #[test]
    fn test_require_unknown_level() {
        let catalog = LevelCatalog::new(vec![level(Era::Old, 1)]).unwrap();
        let err = catalog.require(Era::Future, 3).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownLevel { era: Era::Future, id: 3 }));
        assert!(catalog.require(Era::Old, 1).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_level() {
        let err = LevelCatalog::new(vec![level(Era::Old, 1), level(Era::Old, 1)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLevel { .. }));
    }

    #[test]
    fn test_rejects_duplicate_coin_ids() {
        let mut bad = level(Era::Old, 1);
        bad.coins.push(bad.coins[0].clone());
        bad.total_coins = 2;
        let err = LevelCatalog::new(vec![bad]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCoinId { .. }));
    }

    #[test]
    fn test_rejects_negative_moving_range() {
        let mut bad = level(Era::Current, 4);
        bad.platforms.push(Platform::moving(10.0, 10.0, 50.0, 10.0, -5.0));
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, CatalogError::NegativeMovingRange { index: 1, .. }));
    }

    #[test]
    fn test_rejects_negative_platform_size() {
        let mut bad = level(Era::Current, 4);
        bad.platforms[0].width = -1.0;
        assert!(matches!(bad.validate(), Err(CatalogError::NegativeSize { .. })));
    }

    #[test]
    fn test_total_coins_mismatch_is_only_a_warning() {
        let mut odd = level(Era::Old, 1);
        odd.total_coins = 7;
        assert!(odd.validate().is_ok());
    }

    #[test]
    fn test_route_and_era_names() {
        assert_eq!(level(Era::Future, 2).route(), "/play/future/2");
        assert_eq!("Current".parse::<Era>(), Ok(Era::Current));
        assert_eq!("now".parse::<Era>(), Ok(Era::Current));
        assert_eq!(
            "ancient".parse::<Era>(),
            Err(ParseEraError("ancient".to_string()))
        );
        for era in Era::ALL {
            assert_eq!(era.as_str().parse::<Era>(), Ok(era));
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = LevelCatalog::from_json("[{ \"id\": 1 }]").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }
}
