//! # Generation Module
//!
//! Random encounter composition.
//!
//! A composer fills an XP budget with monster groups drawn from the catalog.
//! Composers are pluggable behind [`EncounterComposer`] so the ledger does not
//! depend on any particular strategy.

pub mod encounters;

pub use encounters::*;

use crate::{Monster, MonsterCatalog, MonsterFilters, WarbandResult};
use rand::rngs::StdRng;
use std::sync::Arc;

/// What a composer is asked to build.
#[derive(Debug, Clone)]
pub struct CompositionRequest<'a> {
    pub player_count: u32,
    /// Per-character XP for the target difficulty
    pub target_exp: u64,
    pub filters: &'a MonsterFilters,
}

/// One monster group chosen by a composer.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterSelection {
    pub monster: Arc<Monster>,
    pub qty: u32,
}

/// Trait for random encounter composers.
pub trait EncounterComposer: Send + Sync {
    /// Produces monster groups whose adjusted XP approximates the request's budget.
    fn compose(
        &self,
        request: &CompositionRequest<'_>,
        catalog: &MonsterCatalog,
        rng: &mut StdRng,
    ) -> WarbandResult<Vec<MonsterSelection>>;

    /// Gets the composer type name for logging and debugging.
    fn composer_type(&self) -> &'static str;
}

/// Utility functions for generation.
pub mod utils {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator.
    pub fn create_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }
}
