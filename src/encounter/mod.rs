//! # Encounter Module
//!
//! The encounter ledger: the monster groups selected for an encounter, their
//! running XP totals, and the difficulty figures derived from them.
//!
//! This module contains:
//! - The ledger aggregate and its configuration
//! - Threat levels and difficulty classification
//! - Snapshots and the stores they are persisted to
//! - Batch tokens that hold back autosave during multi-step updates

pub mod batch;
pub mod snapshot;
pub mod store;
pub mod threat;

pub use batch::*;
pub use snapshot::*;
pub use store::*;
pub use threat::*;

use crate::config::{DEFAULT_PARTY_LEVEL, DEFAULT_PLAYER_COUNT, DEFAULT_STORE_KEY};
use crate::generation::utils::create_rng;
use crate::{
    get_multiplier, matches, CompositionRequest, EncounterComposer, LevelThresholds,
    MatchOptions, Monster, MonsterCatalog, MonsterFilters, MonsterId, MultiplierFn,
    TargetDifficulty, TemplateComposer, WarbandError, WarbandResult,
};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

/// Configuration for an encounter ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Random seed for encounter generation and rerolls
    pub seed: u64,
    /// Key snapshots are stored under
    pub store_key: String,
    /// Party size before anything is loaded
    pub default_player_count: u32,
    /// Party level before anything is loaded
    pub default_party_level: u32,
}

impl LedgerConfig {
    /// Creates a configuration with the standard defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::LedgerConfig;
    ///
    /// let config = LedgerConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert_eq!(config.default_player_count, 4);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            store_key: DEFAULT_STORE_KEY.to_string(),
            default_player_count: DEFAULT_PLAYER_COUNT,
            default_party_level: DEFAULT_PARTY_LEVEL,
        }
    }

    /// Creates a configuration for testing that stores under its own key.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            store_key: "warband-test".to_string(),
            ..Self::new(seed)
        }
    }

    /// Creates a configuration with a random seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A monster and how many of it are in the encounter.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterGroup {
    pub monster: Arc<Monster>,
    /// Always at least one; empty groups are removed
    pub qty: u32,
}

/// Result of rerolling a single group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomizeOutcome {
    /// The group was replaced by another monster of the same CR
    Swapped {
        replaced: MonsterId,
        replacement: MonsterId,
        qty: u32,
    },
    /// No other monster qualified; the encounter is unchanged
    NoCandidate,
}

/// The encounter being built for one session.
///
/// Keeps running totals of monster count and raw XP, recomputes threat levels
/// when the party changes, and saves itself to its store after every mutation
/// unless a [`LedgerBatch`] is held.
pub struct EncounterLedger {
    session_id: Uuid,
    config: LedgerConfig,
    catalog: Arc<MonsterCatalog>,
    store: Arc<dyn EncounterStore>,
    composer: Box<dyn EncounterComposer>,
    multiplier: MultiplierFn,
    rng: StdRng,
    groups: BTreeMap<MonsterId, EncounterGroup>,
    total_quantity: u32,
    total_raw_exp: u64,
    party_level: LevelThresholds,
    player_count: u32,
    threat: Threat,
    reference: Option<EncounterSnapshot>,
    batch_depth: u32,
    pending_save: bool,
}

impl fmt::Debug for EncounterLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncounterLedger")
            .field("session_id", &self.session_id)
            .field("groups", &self.groups.len())
            .field("total_quantity", &self.total_quantity)
            .field("total_raw_exp", &self.total_raw_exp)
            .field("party_level", &self.party_level.level)
            .field("player_count", &self.player_count)
            .field("composer", &self.composer.composer_type())
            .finish_non_exhaustive()
    }
}

impl EncounterLedger {
    /// Creates an empty ledger. Nothing is loaded or saved.
    pub fn new(
        catalog: Arc<MonsterCatalog>,
        store: Arc<dyn EncounterStore>,
        config: LedgerConfig,
    ) -> WarbandResult<Self> {
        let party_level = LevelThresholds::for_level(config.default_party_level)?;
        if config.default_player_count == 0 {
            return Err(WarbandError::InvalidPlayerCount(0));
        }

        let player_count = config.default_player_count;
        let session_id = Uuid::new_v4();
        log::debug!("Creating encounter ledger {}", session_id);

        Ok(Self {
            session_id,
            rng: create_rng(config.seed),
            config,
            catalog,
            store,
            composer: Box::new(TemplateComposer::new()),
            multiplier: get_multiplier,
            groups: BTreeMap::new(),
            total_quantity: 0,
            total_raw_exp: 0,
            party_level,
            player_count,
            threat: Threat::calculate(player_count, &party_level),
            reference: None,
            batch_depth: 0,
            pending_save: false,
        })
    }

    /// Creates a ledger and hydrates it from its store.
    pub async fn open(
        catalog: Arc<MonsterCatalog>,
        store: Arc<dyn EncounterStore>,
        config: LedgerConfig,
    ) -> WarbandResult<Self> {
        let mut ledger = Self::new(catalog, store, config)?;
        ledger.thaw().await?;
        Ok(ledger)
    }

    /// Replaces the random encounter composer.
    pub fn with_composer(mut self, composer: Box<dyn EncounterComposer>) -> Self {
        self.composer = composer;
        self
    }

    /// Replaces the group-size multiplier lookup.
    pub fn with_multiplier(mut self, multiplier: MultiplierFn) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<MonsterCatalog> {
        &self.catalog
    }

    pub fn groups(&self) -> &BTreeMap<MonsterId, EncounterGroup> {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&EncounterGroup> {
        self.groups.get(id)
    }

    pub fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    pub fn total_raw_exp(&self) -> u64 {
        self.total_raw_exp
    }

    pub fn party_level(&self) -> &LevelThresholds {
        &self.party_level
    }

    pub fn player_count(&self) -> u32 {
        self.player_count
    }

    pub fn threat(&self) -> &Threat {
        &self.threat
    }

    /// Snapshot the ledger was last loaded from; `None` once it has been changed.
    pub fn reference(&self) -> Option<&EncounterSnapshot> {
        self.reference.as_ref()
    }

    /// Returns true while a [`LedgerBatch`] is held.
    pub fn is_batch_active(&self) -> bool {
        self.batch_depth > 0
    }

    /// Starts a batch; autosave is held back until the returned guard drops.
    pub fn begin_batch(&mut self) -> LedgerBatch<'_> {
        LedgerBatch::new(self)
    }

    /// Adds `qty` of a monster, creating its group if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use warband::{
    ///     EncounterLedger, LedgerConfig, MemoryStore, Monster, MonsterArgs, MonsterCatalog,
    /// };
    ///
    /// let orc = Arc::new(
    ///     Monster::new(MonsterArgs {
    ///         id: "orc".to_string(),
    ///         name: "Orc".to_string(),
    ///         monster_type: "Humanoid".to_string(),
    ///         cr: "1/2".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .unwrap(),
    /// );
    /// let mut ledger = EncounterLedger::new(
    ///     Arc::new(MonsterCatalog::default()),
    ///     Arc::new(MemoryStore::new()),
    ///     LedgerConfig::for_testing(1),
    /// )
    /// .unwrap();
    ///
    /// ledger.add(&orc, 3);
    /// assert_eq!(ledger.total_quantity(), 3);
    /// assert_eq!(ledger.total_raw_exp(), 300);
    /// assert_eq!(ledger.adjusted_exp(), 600);
    /// ```
    pub fn add(&mut self, monster: &Arc<Monster>, qty: u32) {
        if qty == 0 {
            return;
        }

        self.insert_group(monster, qty);
        self.reference = None;
        log::debug!(
            "[{}] Added {} x {} ({} XP total)",
            self.session_id,
            qty,
            monster.id,
            self.total_raw_exp
        );
        self.persist();
    }

    /// Removes one of a monster, or its whole group with `remove_all`.
    ///
    /// Returns the quantity left in the group; the group is deleted when that
    /// reaches zero.
    pub fn remove(&mut self, monster: &Monster, remove_all: bool) -> WarbandResult<u32> {
        let group = self
            .groups
            .get_mut(&monster.id)
            .ok_or_else(|| WarbandError::GroupNotFound(monster.id.clone()))?;

        let removed = if remove_all { group.qty } else { 1 };
        group.qty -= removed;
        let remaining = group.qty;
        let exp = group.monster.cr.exp;

        self.total_quantity -= removed;
        self.total_raw_exp -= exp * removed as u64;
        if remaining == 0 {
            self.groups.remove(&monster.id);
        }

        self.reference = None;
        log::debug!(
            "[{}] Removed {} x {}, {} left",
            self.session_id,
            removed,
            monster.id,
            remaining
        );
        self.persist();
        Ok(remaining)
    }

    /// Empties the encounter, then replays a snapshot's groups if one is given.
    ///
    /// Every snapshot id must resolve in the catalog; if one does not, the
    /// ledger is left untouched. Party level and player count are not taken
    /// from the snapshot; see [`restore`](Self::restore) for that.
    pub fn reset(&mut self, snapshot: Option<&EncounterSnapshot>) -> WarbandResult<()> {
        let resolved = match snapshot {
            Some(snapshot) => self.resolve(snapshot)?,
            None => Vec::new(),
        };

        self.groups.clear();
        self.total_quantity = 0;
        self.total_raw_exp = 0;
        for (monster, qty) in &resolved {
            self.insert_group(monster, *qty);
        }
        self.reference = snapshot.cloned();

        self.recalculate_threat_levels();
        Ok(())
    }

    /// Recomputes threat levels from the player count and party level.
    pub fn recalculate_threat_levels(&mut self) {
        self.threat = Threat::calculate(self.player_count, &self.party_level);
        self.persist();
    }

    /// Changes the party size.
    pub fn set_player_count(&mut self, player_count: u32) -> WarbandResult<()> {
        if player_count == 0 {
            return Err(WarbandError::InvalidPlayerCount(player_count));
        }
        self.player_count = player_count;
        self.recalculate_threat_levels();
        Ok(())
    }

    /// Changes the party level (1-based).
    pub fn set_party_level(&mut self, level: u32) -> WarbandResult<()> {
        self.party_level = LevelThresholds::for_level(level)?;
        self.recalculate_threat_levels();
        Ok(())
    }

    /// Raw XP scaled by the multiplier for the current party and monster count.
    pub fn adjusted_exp(&self) -> u64 {
        let multiplier = (self.multiplier)(self.player_count, self.total_quantity);
        (self.total_raw_exp as f64 * multiplier).floor() as u64
    }

    /// Difficulty of the encounter for the current party.
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::classify(self.adjusted_exp(), self.player_count, &self.party_level)
    }

    /// Replaces the encounter with a randomly composed one.
    ///
    /// Returns the number of groups placed.
    pub fn generate_random(
        &mut self,
        filters: &MonsterFilters,
        target: TargetDifficulty,
    ) -> WarbandResult<usize> {
        let request = CompositionRequest {
            player_count: self.player_count,
            target_exp: self.party_level.for_difficulty(target),
            filters,
        };
        let selections = self
            .composer
            .compose(&request, &self.catalog, &mut self.rng)?;

        log::info!(
            "[{}] {} composed {} groups for a {:?} encounter",
            self.session_id,
            self.composer.composer_type(),
            selections.len(),
            target
        );

        let mut batch = self.begin_batch();
        batch.reset(None)?;
        for selection in &selections {
            batch.add(&selection.monster, selection.qty);
        }
        Ok(selections.len())
    }

    /// Swaps one group for a different monster of the same challenge rating,
    /// keeping its quantity.
    ///
    /// Candidates already in the encounter are skipped. CR filter bounds are
    /// ignored because the CR is fixed by the group being replaced.
    pub fn randomize(
        &mut self,
        monster: &Monster,
        filters: &MonsterFilters,
    ) -> WarbandResult<RandomizeOutcome> {
        let qty = self
            .groups
            .get(&monster.id)
            .map(|group| group.qty)
            .ok_or_else(|| WarbandError::GroupNotFound(monster.id.clone()))?;

        let options = MatchOptions::default().skip_cr_check();
        let replacement = self
            .catalog
            .shuffled_by_cr(monster.cr.string, &mut self.rng)
            .into_iter()
            .filter(|candidate| !self.groups.contains_key(&candidate.id))
            .find(|candidate| matches(candidate, filters, options));

        let Some(replacement) = replacement else {
            log::debug!(
                "[{}] No replacement for {} at CR {}",
                self.session_id,
                monster.id,
                monster.cr.string
            );
            return Ok(RandomizeOutcome::NoCandidate);
        };

        let mut batch = self.begin_batch();
        batch.remove(monster, true)?;
        batch.add(&replacement, qty);

        Ok(RandomizeOutcome::Swapped {
            replaced: monster.id.clone(),
            replacement: replacement.id.clone(),
            qty,
        })
    }

    /// Flattens the ledger into a snapshot.
    pub fn freeze(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            groups: self
                .groups
                .iter()
                .map(|(id, group)| (id.clone(), group.qty))
                .collect(),
            party_level: self.party_level.level,
            player_count: self.player_count,
        }
    }

    /// Applies a snapshot's party settings and groups without saving it back.
    ///
    /// Fails without changing the ledger if the snapshot's level, player count
    /// or any monster id is invalid.
    pub fn restore(&mut self, snapshot: &EncounterSnapshot) -> WarbandResult<()> {
        let party_level = LevelThresholds::for_level(snapshot.party_level)?;
        if snapshot.player_count == 0 {
            return Err(WarbandError::InvalidPlayerCount(0));
        }

        let pending = self.pending_save;
        self.batch_depth += 1;
        let result = self.reset(Some(snapshot)).map(|()| {
            self.party_level = party_level;
            self.player_count = snapshot.player_count;
            self.recalculate_threat_levels();
        });
        self.batch_depth -= 1;
        self.pending_save = pending;

        result
    }

    /// Future loading this ledger's stored snapshot.
    ///
    /// The future owns everything it needs, so the ledger stays usable while
    /// the load is in flight. Pass the result to [`restore`](Self::restore).
    pub fn load_stored(
        &self,
    ) -> impl Future<Output = WarbandResult<Option<EncounterSnapshot>>> + Send + 'static {
        let store = Arc::clone(&self.store);
        let key = self.config.store_key.clone();
        async move { store.get(&key).await }
    }

    /// Loads and restores the stored snapshot. Returns false if none was stored.
    pub async fn thaw(&mut self) -> WarbandResult<bool> {
        match self.load_stored().await? {
            Some(snapshot) => {
                self.restore(&snapshot)?;
                log::info!(
                    "[{}] Restored encounter with {} groups at party level {}",
                    self.session_id,
                    snapshot.groups.len(),
                    snapshot.party_level
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn resolve(&self, snapshot: &EncounterSnapshot) -> WarbandResult<Vec<(Arc<Monster>, u32)>> {
        snapshot
            .groups
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(id, qty)| Ok((self.catalog.require(id)?, *qty)))
            .collect()
    }

    fn insert_group(&mut self, monster: &Arc<Monster>, qty: u32) {
        self.groups
            .entry(monster.id.clone())
            .or_insert_with(|| EncounterGroup {
                monster: Arc::clone(monster),
                qty: 0,
            })
            .qty += qty;
        self.total_quantity += qty;
        self.total_raw_exp += monster.cr.exp * qty as u64;
    }

    /// Saves to the store, or defers the save while a batch is held.
    fn persist(&mut self) {
        if self.batch_depth > 0 {
            self.pending_save = true;
            return;
        }

        let snapshot = self.freeze();
        self.store.set(&self.config.store_key, &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MonsterArgs, Size, SourceRef};

    fn monster(id: &str, cr: &str, monster_type: &str) -> MonsterArgs {
        MonsterArgs {
            id: id.to_string(),
            name: id.to_string(),
            monster_type: monster_type.to_string(),
            size: Some(Size::Medium),
            cr: cr.to_string(),
            sources: vec![SourceRef::new("core")],
            ..Default::default()
        }
    }

    fn catalog() -> Arc<MonsterCatalog> {
        Arc::new(
            MonsterCatalog::from_args(vec![
                monster("goblin", "1/4", "Humanoid"),
                monster("wolf", "1/4", "Beast"),
                monster("orc", "1/2", "Humanoid"),
                monster("owlbear", "3", "Monstrosity"),
                monster("basilisk", "3", "Monstrosity"),
                monster("ogre", "2", "Giant"),
            ])
            .unwrap(),
        )
    }

    fn ledger() -> (EncounterLedger, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let ledger =
            EncounterLedger::new(catalog(), store.clone(), LedgerConfig::for_testing(7)).unwrap();
        (ledger, store)
    }

    fn get(ledger: &EncounterLedger, id: &str) -> Arc<Monster> {
        ledger.catalog().require(id).unwrap()
    }

    #[test]
    fn test_new_ledger_is_empty_and_unsaved() {
        let (ledger, store) = ledger();
        assert!(ledger.groups().is_empty());
        assert_eq!(ledger.player_count(), 4);
        assert_eq!(ledger.party_level().level, 1);
        assert_eq!(ledger.threat().medium, 200.0);
        assert_eq!(ledger.difficulty(), Difficulty::None);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = LedgerConfig {
            default_party_level: 25,
            ..LedgerConfig::for_testing(1)
        };
        let result = EncounterLedger::new(catalog(), Arc::new(MemoryStore::new()), config);
        assert!(matches!(result, Err(WarbandError::InvalidPartyLevel(25))));
    }

    #[test]
    fn test_add_accumulates_groups() {
        let (mut ledger, store) = ledger();
        let goblin = get(&ledger, "goblin");

        ledger.add(&goblin, 2);
        ledger.add(&goblin, 1);

        assert_eq!(ledger.group("goblin").unwrap().qty, 3);
        assert_eq!(ledger.total_quantity(), 3);
        assert_eq!(ledger.total_raw_exp(), 150);
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.snapshot("warband-test").unwrap().groups["goblin"], 3);
    }

    #[test]
    fn test_remove_one_and_all() {
        let (mut ledger, _store) = ledger();
        let orc = get(&ledger, "orc");
        let ogre = get(&ledger, "ogre");
        ledger.add(&orc, 3);
        ledger.add(&ogre, 1);

        assert_eq!(ledger.remove(&orc, false).unwrap(), 2);
        assert_eq!(ledger.total_raw_exp(), 650);

        assert_eq!(ledger.remove(&orc, true).unwrap(), 0);
        assert!(ledger.group("orc").is_none());
        assert_eq!(ledger.total_quantity(), 1);
        assert_eq!(ledger.total_raw_exp(), 450);

        assert_eq!(ledger.remove(&ogre, false).unwrap(), 0);
        assert!(ledger.groups().is_empty());
        assert_eq!(ledger.total_raw_exp(), 0);
    }

    #[test]
    fn test_remove_absent_group_is_an_error() {
        let (mut ledger, store) = ledger();
        let wolf = get(&ledger, "wolf");
        assert!(matches!(
            ledger.remove(&wolf, false),
            Err(WarbandError::GroupNotFound(id)) if id == "wolf"
        ));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_mutations_clear_reference() {
        let (mut ledger, _store) = ledger();
        let snapshot = EncounterSnapshot::empty(1, 4).with_group("wolf", 2);
        ledger.reset(Some(&snapshot)).unwrap();
        assert_eq!(ledger.reference(), Some(&snapshot));

        let wolf = get(&ledger, "wolf");
        ledger.add(&wolf, 1);
        assert!(ledger.reference().is_none());
    }

    #[test]
    fn test_reset_without_snapshot() {
        let (mut ledger, _store) = ledger();
        ledger.add(&get(&ledger, "ogre"), 2);
        ledger.set_party_level(5).unwrap();

        ledger.reset(None).unwrap();
        assert!(ledger.groups().is_empty());
        assert_eq!(ledger.total_quantity(), 0);
        assert_eq!(ledger.total_raw_exp(), 0);
        assert_eq!(ledger.threat().medium, 2000.0);
    }

    #[test]
    fn test_reset_with_missing_monster_leaves_ledger_alone() {
        let (mut ledger, _store) = ledger();
        ledger.add(&get(&ledger, "ogre"), 2);

        let snapshot = EncounterSnapshot::empty(1, 4)
            .with_group("goblin", 1)
            .with_group("tarrasque", 1);
        assert!(matches!(
            ledger.reset(Some(&snapshot)),
            Err(WarbandError::MonsterNotFound(id)) if id == "tarrasque"
        ));
        assert_eq!(ledger.group("ogre").unwrap().qty, 2);
        assert_eq!(ledger.total_raw_exp(), 900);
    }

    #[test]
    fn test_party_changes_recalculate_threat() {
        let (mut ledger, store) = ledger();
        ledger.set_party_level(5).unwrap();
        ledger.set_player_count(6).unwrap();

        assert_eq!(ledger.threat().deadly, 6.0 * 1100.0 / 0.5);
        assert_eq!(store.snapshot("warband-test").unwrap().player_count, 6);
        assert!(ledger.set_player_count(0).is_err());
        assert!(ledger.set_party_level(21).is_err());
        assert_eq!(ledger.player_count(), 6);
    }

    #[test]
    fn test_adjusted_exp_and_difficulty() {
        let (mut ledger, _store) = ledger();
        ledger.set_party_level(5).unwrap();

        // 2 ogres: 900 raw x1.5
        ledger.add(&get(&ledger, "ogre"), 2);
        assert_eq!(ledger.adjusted_exp(), 1350);
        assert_eq!(ledger.difficulty(), Difficulty::Easy);

        // +1 owlbear: 1600 raw x2
        ledger.add(&get(&ledger, "owlbear"), 1);
        assert_eq!(ledger.adjusted_exp(), 3200);
        assert_eq!(ledger.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_custom_multiplier() {
        let (ledger, _store) = ledger();
        let mut ledger = ledger.with_multiplier(|_, _| 1.0);
        ledger.add(&get(&ledger, "goblin"), 4);
        assert_eq!(ledger.adjusted_exp(), 200);
    }

    #[test]
    fn test_randomize_swaps_same_cr() {
        let (mut ledger, store) = ledger();
        let owlbear = get(&ledger, "owlbear");
        ledger.add(&owlbear, 2);
        let saves = store.save_count();

        let outcome = ledger.randomize(&owlbear, &MonsterFilters::new()).unwrap();
        assert_eq!(
            outcome,
            RandomizeOutcome::Swapped {
                replaced: "owlbear".to_string(),
                replacement: "basilisk".to_string(),
                qty: 2,
            }
        );
        assert!(ledger.group("owlbear").is_none());
        assert_eq!(ledger.group("basilisk").unwrap().qty, 2);
        assert_eq!(ledger.total_raw_exp(), 1400);
        assert_eq!(store.save_count(), saves + 1);
    }

    #[test]
    fn test_randomize_without_candidate() {
        let (mut ledger, _store) = ledger();
        let goblin = get(&ledger, "goblin");
        ledger.add(&goblin, 2);

        let outcome = ledger
            .randomize(&goblin, &MonsterFilters::new().with_type("Humanoid"))
            .unwrap();
        assert_eq!(outcome, RandomizeOutcome::NoCandidate);
        assert_eq!(ledger.group("goblin").unwrap().qty, 2);

        // The only other CR 1/4 monster is already in the encounter
        ledger.add(&get(&ledger, "wolf"), 1);
        let outcome = ledger.randomize(&goblin, &MonsterFilters::new()).unwrap();
        assert_eq!(outcome, RandomizeOutcome::NoCandidate);
    }

    #[test]
    fn test_randomize_absent_group_is_an_error() {
        let (mut ledger, _store) = ledger();
        let ogre = get(&ledger, "ogre");
        assert!(matches!(
            ledger.randomize(&ogre, &MonsterFilters::new()),
            Err(WarbandError::GroupNotFound(_))
        ));
    }

    #[test]
    fn test_generate_random_replaces_encounter() {
        let (mut ledger, store) = ledger();
        ledger.add(&get(&ledger, "ogre"), 5);
        let saves = store.save_count();

        let mut ledger = ledger.with_composer(Box::new(
            TemplateComposer::new().with_templates(vec![vec![1, 2]]),
        ));
        let placed = ledger
            .generate_random(&MonsterFilters::new(), TargetDifficulty::Medium)
            .unwrap();

        assert!(placed > 0);
        assert_eq!(ledger.groups().len(), placed);
        let sum: u32 = ledger.groups().values().map(|g| g.qty).sum();
        assert_eq!(ledger.total_quantity(), sum);
        assert_eq!(store.save_count(), saves + 1);
    }

    #[test]
    fn test_generate_random_stays_within_target_difficulty() {
        let (mut ledger, _store) = ledger();
        ledger.set_player_count(1).unwrap();
        let mut ledger = ledger.with_composer(Box::new(
            TemplateComposer::new().with_templates(vec![vec![8]]),
        ));

        // A lone level 1 hero cannot afford eight of anything in this catalog
        let placed = ledger
            .generate_random(&MonsterFilters::new(), TargetDifficulty::Easy)
            .unwrap();
        assert_eq!(placed, 0);
        assert_eq!(ledger.difficulty(), Difficulty::None);

        ledger.set_player_count(4).unwrap();
        let mut ledger = ledger.with_composer(Box::new(TemplateComposer::new()));
        for _ in 0..30 {
            ledger
                .generate_random(&MonsterFilters::new(), TargetDifficulty::Easy)
                .unwrap();
            assert!(ledger.difficulty() <= Difficulty::Easy);
        }
    }

    #[test]
    fn test_freeze_and_restore() {
        let (mut ledger, store) = ledger();
        ledger.set_party_level(3).unwrap();
        ledger.set_player_count(5).unwrap();
        ledger.add(&get(&ledger, "orc"), 4);
        let snapshot = ledger.freeze();
        assert_eq!(snapshot.party_level, 3);

        let (mut fresh, fresh_store) = self::ledger();
        fresh.restore(&snapshot).unwrap();
        assert_eq!(fresh.freeze(), snapshot);
        assert_eq!(fresh.player_count(), 5);
        assert_eq!(fresh.threat(), ledger.threat());
        assert_eq!(fresh_store.save_count(), 0);
        assert!(store.save_count() > 0);
    }

    #[test]
    fn test_restore_rejects_bad_snapshot() {
        let (mut ledger, _store) = ledger();
        let bad_level = EncounterSnapshot::empty(0, 4);
        assert!(ledger.restore(&bad_level).is_err());

        let bad_count = EncounterSnapshot::empty(2, 0);
        assert!(ledger.restore(&bad_count).is_err());
        assert_eq!(ledger.party_level().level, 1);
    }

    #[test]
    fn test_nested_batches_save_once() {
        let (mut ledger, store) = ledger();
        let goblin = get(&ledger, "goblin");
        {
            let mut outer = ledger.begin_batch();
            outer.add(&goblin, 1);
            {
                let mut inner = outer.begin_batch();
                inner.add(&goblin, 1);
            }
            assert!(outer.is_batch_active());
            assert_eq!(store.save_count(), 0);
        }
        assert!(!ledger.is_batch_active());
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_empty_batch_does_not_save() {
        let (mut ledger, store) = ledger();
        drop(ledger.begin_batch());
        assert_eq!(store.save_count(), 0);
    }
}
