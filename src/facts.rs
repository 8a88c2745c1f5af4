//! Per-level fact ledger
//!
//! Completing a level reveals a fact about its era. The same level must
//! show the same fact for the rest of the session, so reveals are cached
//! in a [`FactLedger`] owned by whoever owns the session, keyed by
//! `(era, level_id)`.

use std::collections::{BTreeMap, HashMap};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::catalog::Era;
use crate::error::ConfigError;

/// Built-in fact table
const BUILTIN_FACTS: &str = include_str!("../assets/facts.json");

/// Longest fact shown, in characters
pub const MAX_FACT_CHARS: usize = 100;

/// Shown when an era has no facts at all
pub const FALLBACK_FACT: &str = "Dubai has transformed dramatically over the decades.";

/// Facts grouped by era
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactBook {
    facts: HashMap<Era, Vec<String>>,
}

impl FactBook {
    pub fn new(facts: HashMap<Era, Vec<String>>) -> Self {
        Self { facts }
    }

    /// Parse a JSON object of `era -> [fact]`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The facts shipped with the game
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_FACTS)
    }

    pub fn facts_for(&self, era: Era) -> &[String] {
        self.facts.get(&era).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Session-scoped cache of revealed facts
#[derive(Debug, Clone)]
pub struct FactLedger {
    book: FactBook,
    revealed: BTreeMap<(Era, u32), String>,
    rng: Pcg32,
}

impl FactLedger {
    /// Seeded so a session can be replayed
    pub fn new(book: FactBook, seed: u64) -> Self {
        Self {
            book,
            revealed: BTreeMap::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// The fact for a level, picking one on first reveal and returning the
    /// same one afterwards
    pub fn reveal(&mut self, era: Era, level_id: u32) -> &str {
        let Self { book, revealed, rng } = self;
        revealed.entry((era, level_id)).or_insert_with(|| {
            let facts = book.facts_for(era);
            let fact = if facts.is_empty() {
                FALLBACK_FACT
            } else {
                facts[rng.random_range(0..facts.len())].as_str()
            };
            log::debug!("Revealed fact for {}/{}", era, level_id);
            shorten(fact)
        })
    }

    /// A previously revealed fact, without revealing a new one
    pub fn peek(&self, era: Era, level_id: u32) -> Option<&str> {
        self.revealed.get(&(era, level_id)).map(String::as_str)
    }

    /// Forget every reveal
    pub fn clear(&mut self) {
        self.revealed.clear();
    }
}

/// Cut facts over [`MAX_FACT_CHARS`] to fit, marking the cut with `...`
fn shorten(fact: &str) -> String {
    if fact.chars().count() > MAX_FACT_CHARS {
        let mut short: String = fact.chars().take(MAX_FACT_CHARS - 3).collect();
        short.push_str("...");
        short
    } else {
        fact.to_string()
    }
}
