//! # Level Thresholds
//!
//! Per-character XP thresholds for each character level.

use crate::config::MAX_PARTY_LEVEL;
use crate::{WarbandError, WarbandResult};
use serde::{Deserialize, Serialize};

/// Difficulty a random encounter should be built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Deadly,
}

/// XP thresholds for a single character of a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThresholds {
    /// Character level, 1-based
    pub level: u32,
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
    pub deadly: u64,
}

impl LevelThresholds {
    const fn new(level: u32, easy: u64, medium: u64, hard: u64, deadly: u64) -> Self {
        Self {
            level,
            easy,
            medium,
            hard,
            deadly,
        }
    }

    /// Looks up the thresholds for a 1-based character level.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::LevelThresholds;
    ///
    /// let fifth = LevelThresholds::for_level(5).unwrap();
    /// assert_eq!(fifth.medium, 500);
    /// assert!(LevelThresholds::for_level(0).is_err());
    /// ```
    pub fn for_level(level: u32) -> WarbandResult<LevelThresholds> {
        if level == 0 || level > MAX_PARTY_LEVEL {
            return Err(WarbandError::InvalidPartyLevel(level));
        }
        Ok(LEVELS[(level - 1) as usize])
    }

    /// Returns the per-character XP for a target difficulty.
    pub fn for_difficulty(&self, difficulty: TargetDifficulty) -> u64 {
        match difficulty {
            TargetDifficulty::Easy => self.easy,
            TargetDifficulty::Medium => self.medium,
            TargetDifficulty::Hard => self.hard,
            TargetDifficulty::Deadly => self.deadly,
        }
    }

    /// The whole table, index `level - 1`.
    pub fn all() -> &'static [LevelThresholds] {
        &LEVELS
    }
}

static LEVELS: [LevelThresholds; MAX_PARTY_LEVEL as usize] = [
    LevelThresholds::new(1, 25, 50, 75, 100),
    LevelThresholds::new(2, 50, 100, 150, 200),
    LevelThresholds::new(3, 75, 150, 225, 400),
    LevelThresholds::new(4, 125, 250, 375, 500),
    LevelThresholds::new(5, 250, 500, 750, 1100),
    LevelThresholds::new(6, 300, 600, 900, 1400),
    LevelThresholds::new(7, 350, 750, 1100, 1700),
    LevelThresholds::new(8, 450, 900, 1400, 2100),
    LevelThresholds::new(9, 550, 1100, 1600, 2400),
    LevelThresholds::new(10, 600, 1200, 1900, 2800),
    LevelThresholds::new(11, 800, 1600, 2400, 3600),
    LevelThresholds::new(12, 1000, 2000, 3000, 4500),
    LevelThresholds::new(13, 1100, 2200, 3400, 5100),
    LevelThresholds::new(14, 1250, 2500, 3800, 5700),
    LevelThresholds::new(15, 1400, 2800, 4300, 6400),
    LevelThresholds::new(16, 1600, 3200, 4800, 7200),
    LevelThresholds::new(17, 2000, 3900, 5900, 8800),
    LevelThresholds::new(18, 2100, 4200, 6300, 9500),
    LevelThresholds::new(19, 2400, 4900, 7300, 10900),
    LevelThresholds::new(20, 2800, 5700, 8500, 12700),
];
