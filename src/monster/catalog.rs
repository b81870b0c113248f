//! # Monster Catalog
//!
//! Read-only collection of every known monster, indexed by id.

use crate::{matches, MatchOptions, Monster, MonsterArgs, MonsterFilters, MonsterId};
use crate::{WarbandError, WarbandResult};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// The master monster list, shared between ledgers.
#[derive(Debug, Clone, Default)]
pub struct MonsterCatalog {
    monsters: Vec<Arc<Monster>>,
    by_id: HashMap<MonsterId, Arc<Monster>>,
}

impl MonsterCatalog {
    /// Creates a catalog from constructed monsters.
    ///
    /// A later monster with a duplicate id replaces the earlier one in the
    /// index but both stay in listing order.
    pub fn new(monsters: impl IntoIterator<Item = Monster>) -> Self {
        let monsters: Vec<Arc<Monster>> = monsters.into_iter().map(Arc::new).collect();
        let by_id = monsters
            .iter()
            .map(|monster| (monster.id.clone(), Arc::clone(monster)))
            .collect();

        Self { monsters, by_id }
    }

    /// Builds every record, failing on the first unresolvable one.
    pub fn from_args(records: impl IntoIterator<Item = MonsterArgs>) -> WarbandResult<Self> {
        let monsters = records
            .into_iter()
            .map(Monster::new)
            .collect::<WarbandResult<Vec<_>>>()?;
        Ok(Self::new(monsters))
    }

    /// Loads a catalog from a JSON array of monster records.
    pub fn from_json(json: &str) -> WarbandResult<Self> {
        let records: Vec<MonsterArgs> = serde_json::from_str(json)?;
        let catalog = Self::from_args(records)?;
        log::info!("Loaded monster catalog with {} monsters", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Monster>> {
        self.by_id.get(id)
    }

    /// Resolves an id, treating a miss as an error.
    pub fn require(&self, id: &str) -> WarbandResult<Arc<Monster>> {
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| WarbandError::MonsterNotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Monster>> {
        self.monsters.iter()
    }

    /// Monsters of the given CR token in random order.
    pub fn shuffled_by_cr<R: Rng + ?Sized>(&self, cr: &str, rng: &mut R) -> Vec<Arc<Monster>> {
        let mut list: Vec<Arc<Monster>> = self
            .monsters
            .iter()
            .filter(|monster| monster.cr.string == cr)
            .cloned()
            .collect();
        list.shuffle(rng);
        list
    }

    /// Monsters passing the filters, in catalog order.
    pub fn filter(&self, filters: &MonsterFilters, options: MatchOptions) -> Vec<Arc<Monster>> {
        self.monsters
            .iter()
            .filter(|monster| matches(monster, filters, options))
            .cloned()
            .collect()
    }
}
