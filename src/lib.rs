//! # Warband
//!
//! Encounter difficulty accounting and monster matching for building balanced
//! tabletop encounters.
//!
//! ## Architecture Overview
//!
//! - **Tables**: challenge ratings, per-level XP thresholds, alignments and the
//!   group-size multiplier
//! - **Monsters**: immutable monster records, the catalog they live in, and the
//!   filter predicate used to match them
//! - **Encounter Ledger**: the mutable encounter aggregate with running XP totals,
//!   threat thresholds and difficulty classification
//! - **Generation**: composers that fill an XP budget with random monster groups
//!
//! Persistence goes through the [`EncounterStore`] trait so the ledger never
//! reaches for ambient global state.

pub mod encounter;
pub mod generation;
pub mod monster;
pub mod tables;

pub use encounter::*;
pub use generation::*;
pub use monster::*;
pub use tables::*;

/// Core error type for the Warband encounter engine.
#[derive(thiserror::Error, Debug)]
pub enum WarbandError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Challenge rating token has no entry in the CR table
    #[error("Unknown challenge rating: {0}")]
    UnknownChallengeRating(String),

    /// Alignment name has no entry in the alignment table
    #[error("Unknown alignment: {0}")]
    UnknownAlignment(String),

    /// Monster id is absent from the catalog
    #[error("Monster not found in catalog: {0}")]
    MonsterNotFound(String),

    /// Encounter has no group for the monster id
    #[error("No encounter group for monster: {0}")]
    GroupNotFound(String),

    /// Party level outside the level table
    #[error("Invalid party level: {0}")]
    InvalidPartyLevel(u32),

    /// Player count must be at least one
    #[error("Invalid player count: {0}")]
    InvalidPlayerCount(u32),

    /// Ledger or snapshot is inconsistent
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Warband codebase.
pub type WarbandResult<T> = Result<T, WarbandError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encounter engine configuration constants.
pub mod config {
    /// Key the ledger snapshot is stored under
    pub const DEFAULT_STORE_KEY: &str = "5em-encounter";

    /// Party size a fresh ledger starts with
    pub const DEFAULT_PLAYER_COUNT: u32 = 4;

    /// Party level a fresh ledger starts with
    pub const DEFAULT_PARTY_LEVEL: u32 = 1;

    /// Highest character level in the level table
    pub const MAX_PARTY_LEVEL: u32 = 20;

    /// Random encounters spend XP conservatively; this pushes the budget up
    /// towards the requested difficulty.
    pub const RANDOM_BUDGET_FUDGE: f64 = 1.1;
}
