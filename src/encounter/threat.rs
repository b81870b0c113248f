//! # Threat Levels
//!
//! XP budgets for each flavour of encounter and the difficulty classification
//! of an encounter's adjusted XP.

use crate::LevelThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisors applied to the party budget, chosen by party size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatTier {
    pub single: f64,
    pub pair: f64,
    pub group: f64,
    pub trivial: f64,
}

impl ThreatTier {
    /// Small parties (fewer than three) get larger divisors, large parties
    /// (more than five) smaller ones.
    pub fn for_party(player_count: u32) -> Self {
        if player_count < 3 {
            Self {
                single: 1.5,
                pair: 2.0,
                group: 2.5,
                trivial: 3.0,
            }
        } else if player_count > 5 {
            Self {
                single: 0.5,
                pair: 1.0,
                group: 1.5,
                trivial: 2.0,
            }
        } else {
            Self {
                single: 1.0,
                pair: 1.5,
                group: 2.0,
                trivial: 2.5,
            }
        }
    }
}

/// Raw XP that makes an encounter of each flavour for the current party.
///
/// `deadly` through `easy` are budgets for a single monster; `pair`, `group`
/// and `trivial` are per-monster budgets for medium encounters of two, four and
/// eight monsters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub deadly: f64,
    pub hard: f64,
    pub medium: f64,
    pub easy: f64,
    pub pair: f64,
    pub group: f64,
    pub trivial: f64,
}

impl Threat {
    /// Computes threat levels for a party of `player_count` at `level`.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{LevelThresholds, Threat};
    ///
    /// let level = LevelThresholds::for_level(1).unwrap();
    /// let threat = Threat::calculate(4, &level);
    /// assert_eq!(threat.medium, 200.0);
    /// assert_eq!(threat.pair, 200.0 / 3.0);
    /// ```
    pub fn calculate(player_count: u32, level: &LevelThresholds) -> Self {
        let count = player_count as f64;
        let medium_exp = count * level.medium as f64;
        let tier = ThreatTier::for_party(player_count);

        Self {
            deadly: count * level.deadly as f64 / tier.single,
            hard: count * level.hard as f64 / tier.single,
            medium: medium_exp / tier.single,
            easy: count * level.easy as f64 / tier.single,
            pair: medium_exp / (2.0 * tier.pair),
            group: medium_exp / (4.0 * tier.group),
            trivial: medium_exp / (8.0 * tier.trivial),
        }
    }
}

/// Difficulty classification of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// No monsters, or monsters worth no XP
    None,
    /// Below the easy threshold
    Trivial,
    Easy,
    Medium,
    Hard,
    Deadly,
}

impl Difficulty {
    /// Classifies adjusted XP against the party's thresholds. Each threshold is
    /// the inclusive lower bound of its tier.
    pub fn classify(adjusted_exp: u64, player_count: u32, level: &LevelThresholds) -> Self {
        if adjusted_exp == 0 {
            return Difficulty::None;
        }

        let count = player_count as u64;
        if adjusted_exp < count * level.easy {
            Difficulty::Trivial
        } else if adjusted_exp < count * level.medium {
            Difficulty::Easy
        } else if adjusted_exp < count * level.hard {
            Difficulty::Medium
        } else if adjusted_exp < count * level.deadly {
            Difficulty::Hard
        } else {
            Difficulty::Deadly
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::None => "none",
            Difficulty::Trivial => "trivial",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Deadly => "Deadly",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
