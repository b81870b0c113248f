//! # Encounter Snapshots
//!
//! Flat, persistable form of an encounter ledger.

use crate::{MonsterId, WarbandError, WarbandResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Frozen encounter: monster quantities plus party settings.
///
/// Serializes as `{"groups": {...}, "partyLevel": n, "playerCount": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterSnapshot {
    /// Quantity per monster id
    pub groups: BTreeMap<MonsterId, u32>,
    /// 1-based character level
    pub party_level: u32,
    pub player_count: u32,
}

impl EncounterSnapshot {
    /// Creates a snapshot with no monsters.
    pub fn empty(party_level: u32, player_count: u32) -> Self {
        Self {
            groups: BTreeMap::new(),
            party_level,
            player_count,
        }
    }

    /// Adds monsters to the snapshot, for building fixtures by hand.
    pub fn with_group(mut self, id: impl Into<MonsterId>, qty: u32) -> Self {
        *self.groups.entry(id.into()).or_insert(0) += qty;
        self
    }

    /// Saves the snapshot as JSON.
    pub fn save_to_json(&self) -> WarbandResult<String> {
        serde_json::to_string_pretty(self).map_err(WarbandError::from)
    }

    /// Loads a snapshot from JSON.
    pub fn load_from_json(json: &str) -> WarbandResult<Self> {
        serde_json::from_str(json).map_err(WarbandError::from)
    }
}
