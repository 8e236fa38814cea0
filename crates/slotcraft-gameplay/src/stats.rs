//! Crafting statistics.

use ahash::AHashMap;
use slotcraft_common::RecipeId;

/// Counters accumulated by the engine.
#[derive(Debug, Clone, Default)]
pub struct CraftingStats {
    /// Evaluation passes run.
    pub evaluations: u64,
    /// Crafts completed.
    pub crafts_completed: u64,
    /// Evaluations that ended without a match.
    pub no_matches: u64,
    /// Replenish passes that ran.
    pub respawns_performed: u64,
    /// Replenish passes skipped for lack of a target.
    pub respawns_skipped: u64,
    /// Grid operations rejected (bad index or occupied slot).
    pub rejected_operations: u64,
    /// Crafts per recipe ID.
    pub crafts_by_recipe: AHashMap<u32, u32>,
}

impl CraftingStats {
    /// Creates new empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of an evaluation.
    pub fn record_evaluation(&mut self) {
        self.evaluations += 1;
    }

    /// Records a completed craft.
    pub fn record_craft(&mut self, recipe_id: RecipeId) {
        self.crafts_completed += 1;
        *self.crafts_by_recipe.entry(recipe_id.raw()).or_insert(0) += 1;
    }

    /// Records an evaluation without a match.
    pub fn record_no_match(&mut self) {
        self.no_matches += 1;
    }

    /// Records a replenish outcome.
    pub fn record_respawn(&mut self, performed: bool) {
        if performed {
            self.respawns_performed += 1;
        } else {
            self.respawns_skipped += 1;
        }
    }

    /// Records a rejected grid operation.
    pub fn record_rejection(&mut self) {
        self.rejected_operations += 1;
    }

    /// Returns the most crafted recipe ID and its count.
    ///
    /// Ties resolve to the lowest recipe ID.
    #[must_use]
    pub fn most_crafted_recipe(&self) -> Option<(u32, u32)> {
        self.crafts_by_recipe
            .iter()
            .max_by_key(|(id, count)| (**count, std::cmp::Reverse(**id)))
            .map(|(id, count)| (*id, *count))
    }
}
