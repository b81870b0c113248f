//! # Update Batches
//!
//! Guard that suppresses autosave while a group of ledger mutations runs.

use crate::EncounterLedger;
use std::ops::{Deref, DerefMut};

/// Batch token returned by [`EncounterLedger::begin_batch`].
///
/// Derefs to the ledger. While any batch is alive the ledger does not write to
/// its store; when the outermost batch drops, one save is issued if anything
/// inside the batch asked for one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use warband::{EncounterLedger, LedgerConfig, MemoryStore, MonsterCatalog};
///
/// let store = Arc::new(MemoryStore::new());
/// let mut ledger = EncounterLedger::new(
///     Arc::new(MonsterCatalog::default()),
///     store.clone(),
///     LedgerConfig::for_testing(1),
/// )
/// .unwrap();
///
/// {
///     let mut batch = ledger.begin_batch();
///     batch.set_player_count(5).unwrap();
///     batch.set_party_level(3).unwrap();
///     assert_eq!(store.save_count(), 0);
/// }
/// assert_eq!(store.save_count(), 1);
/// ```
pub struct LedgerBatch<'a> {
    ledger: &'a mut EncounterLedger,
}

impl<'a> LedgerBatch<'a> {
    pub(crate) fn new(ledger: &'a mut EncounterLedger) -> Self {
        ledger.batch_depth += 1;
        Self { ledger }
    }
}

impl Deref for LedgerBatch<'_> {
    type Target = EncounterLedger;

    fn deref(&self) -> &EncounterLedger {
        self.ledger
    }
}

impl DerefMut for LedgerBatch<'_> {
    fn deref_mut(&mut self) -> &mut EncounterLedger {
        self.ledger
    }
}

impl Drop for LedgerBatch<'_> {
    fn drop(&mut self) {
        self.ledger.batch_depth -= 1;
        if self.ledger.batch_depth == 0 && self.ledger.pending_save {
            self.ledger.pending_save = false;
            self.ledger.persist();
        }
    }
}
