//! # Encounter Generation
//!
//! Template-driven random encounter composer. A group template such as
//! `[1, 5]` (a leader and five followers) is picked at random, then each group
//! is filled with the strongest monster whose XP fits its share of the budget.

use crate::config::RANDOM_BUDGET_FUDGE;
use crate::{
    get_multiplier, matches, ChallengeRating, CompositionRequest, EncounterComposer, MatchOptions,
    Monster, MonsterCatalog, MonsterFilters, MonsterSelection, MultiplierFn, WarbandError,
    WarbandResult,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Group templates; each entry is the monster count of one group.
pub const ENCOUNTER_TEMPLATES: &[&[u32]] = &[
    &[1],
    &[1, 2],
    &[1, 5],
    &[1, 1, 1],
    &[1, 1, 2],
    &[1, 2, 3],
    &[2, 2],
    &[2, 4],
    &[8],
];

/// Composer that fills a randomly chosen group template.
#[derive(Debug, Clone)]
pub struct TemplateComposer {
    templates: Vec<Vec<u32>>,
    fudge: f64,
    multiplier: MultiplierFn,
}

impl Default for TemplateComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateComposer {
    /// Creates a composer using the standard templates.
    pub fn new() -> Self {
        Self {
            templates: ENCOUNTER_TEMPLATES.iter().map(|t| t.to_vec()).collect(),
            fudge: RANDOM_BUDGET_FUDGE,
            multiplier: get_multiplier,
        }
    }

    /// Replaces the template set, e.g. to force a single layout.
    pub fn with_templates(mut self, templates: Vec<Vec<u32>>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_fudge(mut self, fudge: f64) -> Self {
        self.fudge = fudge;
        self
    }

    pub fn with_multiplier(mut self, multiplier: MultiplierFn) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Finds a monster for one group, starting at the highest CR whose XP fits
    /// `exp_per_monster` and stepping down until a candidate passes the filters.
    ///
    /// Returns `None` when no in-range CR fits the share at all.
    fn pick_monster(
        &self,
        exp_per_monster: f64,
        filters: &MonsterFilters,
        catalog: &MonsterCatalog,
        chosen: &[MonsterSelection],
        rng: &mut StdRng,
    ) -> Option<Arc<Monster>> {
        let tiers: Vec<&ChallengeRating> = ChallengeRating::all()
            .iter()
            .filter(|cr| filters.cr_in_range(cr.numeric))
            .collect();
        if tiers.is_empty() {
            return None;
        }

        // Nothing in range fits the share; overshooting would break the budget
        let best = tiers
            .iter()
            .rposition(|cr| cr.exp as f64 <= exp_per_monster)?;

        let options = MatchOptions::default().skip_cr_check().exclude_unique();
        for cr in tiers[..=best].iter().rev() {
            let candidate = catalog
                .shuffled_by_cr(cr.string, rng)
                .into_iter()
                .filter(|monster| !chosen.iter().any(|s| s.monster.id == monster.id))
                .find(|monster| matches(monster, filters, options));
            if candidate.is_some() {
                return candidate;
            }
        }

        None
    }
}

impl EncounterComposer for TemplateComposer {
    fn compose(
        &self,
        request: &CompositionRequest<'_>,
        catalog: &MonsterCatalog,
        rng: &mut StdRng,
    ) -> WarbandResult<Vec<MonsterSelection>> {
        let template = self
            .templates
            .choose(rng)
            .ok_or_else(|| WarbandError::InvalidState("No encounter templates".to_string()))?;

        let total: u32 = template.iter().sum();
        let multiplier = (self.multiplier)(request.player_count, total);
        if multiplier <= 0.0 {
            return Ok(Vec::new());
        }

        let mut available = (request.target_exp * request.player_count as u64) as f64
            * self.fudge
            / multiplier;
        let mut chosen: Vec<MonsterSelection> = Vec::with_capacity(template.len());

        log::debug!(
            "Composing encounter from template {:?} with {:.0} XP available",
            template,
            available
        );

        for (index, &count) in template.iter().enumerate() {
            if count == 0 || available <= 0.0 {
                continue;
            }

            // Split what is left evenly between the groups still to fill
            let remaining_groups = (template.len() - index) as f64;
            let exp_per_monster = available / remaining_groups / count as f64;

            match self.pick_monster(exp_per_monster, request.filters, catalog, &chosen, rng) {
                Some(monster) => {
                    available -= (monster.cr.exp * count as u64) as f64;
                    chosen.push(MonsterSelection { monster, qty: count });
                }
                None => {
                    log::debug!(
                        "No candidate for a group of {} at {:.0} XP each",
                        count,
                        exp_per_monster
                    );
                }
            }
        }

        Ok(chosen)
    }

    fn composer_type(&self) -> &'static str {
        "TemplateComposer"
    }
}
