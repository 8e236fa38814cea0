//! Crafting engine.
//!
//! The engine owns the grid, the result slot and the material supply. Every
//! placement or removal runs one complete, synchronous evaluation:
//!
//! ```text
//! Idle -> Evaluating -> Matched -> (consume, produce, replenish, notify) -> Idle
//!                    \-> NoMatch -> Idle
//! ```
//!
//! No state survives between calls other than the grid contents, the result
//! slot and the free pool.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotcraft_common::{
    ConfigResult, GridError, GridResult, InstanceId, OutputId, RecipeId, SlotCoord, SupplyResult,
};
use tracing::{debug, error, info, trace, warn};

use crate::events::{CraftingInput, CraftingOutput, EventBus};
use crate::grid::CraftingGrid;
use crate::item::Item;
use crate::recipes::{Recipe, RecipeBook};
use crate::stats::CraftingStats;
use crate::supply::{MaterialInstance, MaterialSupply, ReplenishReport};

/// Engine state machine position.
///
/// Always [`EngineState::Idle`] when observed from outside a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineState {
    /// Waiting for input.
    #[default]
    Idle,
    /// Matching the grid snapshot against the book.
    Evaluating,
    /// A recipe matched; consuming and producing.
    Matched,
    /// No recipe matched.
    NoMatch,
}

/// The single output slot, distinct from the grid slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSlot {
    output: Option<OutputId>,
}

impl ResultSlot {
    /// Current output, if any.
    #[must_use]
    pub fn get(&self) -> Option<&OutputId> {
        self.output.as_ref()
    }

    /// True when nothing has been produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_none()
    }

    /// Collects the output, leaving the slot empty.
    pub fn take(&mut self) -> Option<OutputId> {
        self.output.take()
    }

    fn set(&mut self, output: OutputId) {
        self.output = Some(output);
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// A recipe matched and was crafted.
    Crafted {
        /// Matched recipe.
        recipe: RecipeId,
        /// Produced output.
        output: OutputId,
        /// Items consumed from the grid with their slot index.
        consumed: Vec<(usize, Item)>,
        /// Replenish result; an error means respawn was skipped.
        respawn: SupplyResult<ReplenishReport>,
    },
    /// No recipe matched; the grid is untouched.
    NoMatch,
}

impl Evaluation {
    /// True if a craft happened.
    #[must_use]
    pub fn is_crafted(&self) -> bool {
        matches!(self, Self::Crafted { .. })
    }

    /// Crafted recipe, if any.
    #[must_use]
    pub fn recipe(&self) -> Option<RecipeId> {
        match self {
            Self::Crafted { recipe, .. } => Some(*recipe),
            Self::NoMatch => None,
        }
    }
}

/// Outcome of a handled input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Item taken out of the grid by the operation: the evicted occupant of a
    /// swap, or the item removed from a slot.
    pub displaced: Option<Item>,
    /// Evaluation that followed.
    pub evaluation: Evaluation,
}

/// Orchestrates grid mutation, matching, crafting and replenishment.
#[derive(Debug)]
pub struct CraftingEngine {
    grid: CraftingGrid,
    book: Arc<RecipeBook>,
    result: ResultSlot,
    supply: MaterialSupply,
    events: EventBus,
    stats: CraftingStats,
    state: EngineState,
}

impl CraftingEngine {
    /// Creates an engine with an unbounded event bus.
    ///
    /// Fails if any recipe's pattern length differs from the grid's slot
    /// count. Stocks the free pool once; a missing supply target is reported
    /// but does not prevent construction.
    pub fn new(
        grid: CraftingGrid,
        book: Arc<RecipeBook>,
        supply: MaterialSupply,
    ) -> ConfigResult<Self> {
        Self::with_event_bus(grid, book, supply, EventBus::default())
    }

    /// Creates an engine publishing to `events`.
    pub fn with_event_bus(
        grid: CraftingGrid,
        book: Arc<RecipeBook>,
        supply: MaterialSupply,
        events: EventBus,
    ) -> ConfigResult<Self> {
        book.validate(grid.len())?;

        let mut engine = Self {
            grid,
            book,
            result: ResultSlot::default(),
            supply,
            events,
            stats: CraftingStats::new(),
            state: EngineState::Idle,
        };

        info!(
            "Crafting engine ready: {}x{} grid, {} recipes, {} supplied materials",
            engine.grid.dimensions().width(),
            engine.grid.dimensions().height(),
            engine.book.len(),
            engine.supply.manifest().len()
        );

        if let Err(err) = engine.replenish() {
            debug!("Initial stock skipped: {}", err);
        }
        Ok(engine)
    }

    /// Dispatches an inbound event.
    pub fn handle(&mut self, input: CraftingInput) -> GridResult<StepOutcome> {
        match input {
            CraftingInput::ItemPlaced {
                slot_index,
                item_type,
            } => self.on_item_placed(slot_index, Item::from(item_type)),
            CraftingInput::ItemRemoved { slot_index } => self.on_item_removed(slot_index),
            CraftingInput::ManualCraftRequested => Ok(StepOutcome {
                displaced: None,
                evaluation: self.try_craft_manual(),
            }),
        }
    }

    /// Places an item and re-evaluates.
    ///
    /// On failure the grid is unchanged and no evaluation runs. An evicted
    /// occupant is reported with [`CraftingOutput::ItemReturnedToOrigin`].
    pub fn on_item_placed(&mut self, slot_index: usize, item: Item) -> GridResult<StepOutcome> {
        let item_type = item.item_type().clone();
        let evicted = self
            .grid
            .place(slot_index, item)
            .map_err(|err| self.reject(err))?;

        debug!("Placed {} in slot {}", item_type, slot_index);
        if let Some(previous) = &evicted {
            debug!("Evicted {} from slot {}", previous.item_type(), slot_index);
            self.events.publish(CraftingOutput::ItemReturnedToOrigin {
                item: previous.clone(),
                slot_index,
            });
        }

        Ok(StepOutcome {
            displaced: evicted,
            evaluation: self.evaluate(),
        })
    }

    /// Places an item at a row-major coordinate and re-evaluates.
    pub fn on_item_placed_at(&mut self, coord: SlotCoord, item: Item) -> GridResult<StepOutcome> {
        let index = self
            .grid
            .index_of(coord)
            .map_err(|err| self.reject(err))?;
        self.on_item_placed(index, item)
    }

    /// Empties a slot and re-evaluates.
    pub fn on_item_removed(&mut self, slot_index: usize) -> GridResult<StepOutcome> {
        let removed = self
            .grid
            .clear(slot_index)
            .map_err(|err| self.reject(err))?;

        if let Some(item) = &removed {
            debug!("Removed {} from slot {}", item.item_type(), slot_index);
        }

        Ok(StepOutcome {
            displaced: removed,
            evaluation: self.evaluate(),
        })
    }

    /// Re-evaluates the current grid without a new placement.
    pub fn try_craft_manual(&mut self) -> Evaluation {
        debug!("Manual craft requested");
        self.evaluate()
    }

    /// Collects the crafted output from the result slot.
    pub fn take_result(&mut self) -> Option<OutputId> {
        self.result.take()
    }

    /// Removes a material the player picked up from the free pool.
    pub fn take_material(&mut self, id: InstanceId) -> Option<MaterialInstance> {
        self.supply.take(id)
    }

    /// Drains outbound events in publish order.
    pub fn drain_events(&self) -> Vec<CraftingOutput> {
        self.events.drain()
    }

    /// Number of undrained outbound events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.pending_count()
    }

    /// The grid.
    #[must_use]
    pub fn grid(&self) -> &CraftingGrid {
        &self.grid
    }

    /// The recipe book.
    #[must_use]
    pub fn book(&self) -> &Arc<RecipeBook> {
        &self.book
    }

    /// The result slot.
    #[must_use]
    pub fn result(&self) -> &ResultSlot {
        &self.result
    }

    /// The material supply.
    #[must_use]
    pub fn supply(&self) -> &MaterialSupply {
        &self.supply
    }

    /// Accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &CraftingStats {
        &self.stats
    }

    /// State machine position.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    fn reject(&mut self, err: GridError) -> GridError {
        warn!("Grid operation rejected: {}", err);
        self.stats.record_rejection();
        err
    }

    fn transition(&mut self, next: EngineState) {
        trace!("Engine state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn evaluate(&mut self) -> Evaluation {
        self.transition(EngineState::Evaluating);
        self.stats.record_evaluation();

        if let Some(stale) = self.result.take() {
            debug!("Clearing uncollected result {}", stale);
            self.events
                .publish(CraftingOutput::ResultCleared { output: stale });
        }

        let snapshot = self.grid.snapshot();
        debug!(
            "Evaluating grid with {} of {} slots occupied",
            self.grid.occupied_count(),
            self.grid.len()
        );

        let book = Arc::clone(&self.book);
        let evaluation = match book.find_match(&snapshot) {
            Some(recipe) => self.craft(recipe),
            None => {
                self.transition(EngineState::NoMatch);
                debug!("No recipe matched");
                self.stats.record_no_match();
                self.events.publish(CraftingOutput::NoMatch);
                Evaluation::NoMatch
            },
        };

        self.transition(EngineState::Idle);
        evaluation
    }

    fn craft(&mut self, recipe: &Recipe) -> Evaluation {
        self.transition(EngineState::Matched);

        let consumed = self.grid.clear_all();
        for (slot_index, _) in &consumed {
            self.events.publish(CraftingOutput::SlotCleared {
                slot_index: *slot_index,
            });
        }

        self.result.set(recipe.output.clone());
        self.events.publish(CraftingOutput::ResultProduced {
            output: recipe.output.clone(),
        });

        let respawn = self.replenish();

        info!(
            "Crafted {} via recipe {} ({}), consumed {} items",
            recipe.output,
            recipe.id,
            recipe.name,
            consumed.len()
        );
        self.stats.record_craft(recipe.id);
        self.events
            .publish(CraftingOutput::Crafted { recipe_id: recipe.id });

        Evaluation::Crafted {
            recipe: recipe.id,
            output: recipe.output.clone(),
            consumed,
            respawn,
        }
    }

    fn replenish(&mut self) -> SupplyResult<ReplenishReport> {
        match self.supply.replenish() {
            Ok(report) => {
                if !report.destroyed.is_empty() {
                    self.events.publish(CraftingOutput::MaterialsDestroyed {
                        instances: report.destroyed_ids(),
                    });
                }
                self.events.publish(CraftingOutput::MaterialsRespawned {
                    item_types: report.spawned_types(),
                    instances: report.spawned.iter().map(|m| m.id).collect(),
                });
                self.stats.record_respawn(true);
                Ok(report)
            },
            Err(err) => {
                error!("Respawn skipped: {}", err);
                self.events.publish(CraftingOutput::RespawnSkipped {
                    reason: err.to_string(),
                });
                self.stats.record_respawn(false);
                Err(err)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OccupiedPolicy;
    use proptest::prelude::*;
    use slotcraft_common::{ConfigError, GridDimensions, ItemType, SupplyError};

    fn plank_book() -> Arc<RecipeBook> {
        let plank = Recipe::builder(RecipeId::new(1), "Plank", OutputId::new("Plank"))
            .tags(["Wood", "Wood", "", ""])
            .build();
        let stick = Recipe::builder(RecipeId::new(2), "Stick", OutputId::new("Stick"))
            .tags(["Wood", "", "", ""])
            .build();
        Arc::new(RecipeBook::from_recipes([plank, stick]).expect("unique ids"))
    }

    fn plank_only_book() -> Arc<RecipeBook> {
        let plank = Recipe::builder(RecipeId::new(1), "Plank", OutputId::new("Plank"))
            .tags(["Wood", "Wood", "", ""])
            .build();
        Arc::new(RecipeBook::from_recipes([plank]).expect("unique ids"))
    }

    fn manifest() -> Vec<ItemType> {
        vec![ItemType::new("Wood"), ItemType::new("Stone")]
    }

    fn engine_with(book: Arc<RecipeBook>) -> CraftingEngine {
        let engine = CraftingEngine::new(
            CraftingGrid::default(),
            book,
            MaterialSupply::new(manifest()),
        )
        .expect("valid configuration");
        engine.drain_events();
        engine
    }

    fn wood() -> Item {
        Item::new("Wood")
    }

    #[test]
    fn test_construction_stocks_pool() {
        let engine = CraftingEngine::new(
            CraftingGrid::default(),
            plank_only_book(),
            MaterialSupply::new(manifest()),
        )
        .expect("valid configuration");

        assert_eq!(engine.supply().pool().map(|p| p.len()), Some(2));
        let events = engine.drain_events();
        assert!(matches!(
            events.as_slice(),
            [CraftingOutput::MaterialsRespawned { item_types, .. }] if *item_types == manifest()
        ));
    }

    #[test]
    fn test_construction_rejects_pattern_length_mismatch() {
        let result = CraftingEngine::new(
            CraftingGrid::new(GridDimensions::workbench()),
            plank_only_book(),
            MaterialSupply::new(manifest()),
        );

        assert!(matches!(
            result,
            Err(ConfigError::PatternLength {
                expected: 9,
                actual: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_plank_scenario() {
        let mut engine = engine_with(plank_only_book());

        let first = engine.on_item_placed(0, wood()).expect("valid slot");
        assert_eq!(first.evaluation, Evaluation::NoMatch);
        assert_eq!(engine.drain_events(), vec![CraftingOutput::NoMatch]);
        assert_eq!(engine.grid().occupied_count(), 1);

        let second = engine.on_item_placed(1, wood()).expect("valid slot");
        assert_eq!(second.evaluation.recipe(), Some(RecipeId::new(1)));
        assert_eq!(engine.grid().snapshot(), vec![None, None, None, None]);
        assert_eq!(engine.result().get(), Some(&OutputId::new("Plank")));
        assert_eq!(engine.state(), EngineState::Idle);

        match second.evaluation {
            Evaluation::Crafted {
                consumed, respawn, ..
            } => {
                assert_eq!(consumed, vec![(0, wood()), (1, wood())]);
                assert_eq!(respawn.expect("target attached").spawned.len(), 2);
            },
            Evaluation::NoMatch => panic!("expected a craft"),
        }
    }

    #[test]
    fn test_craft_event_order() {
        let mut engine = engine_with(plank_only_book());
        engine.on_item_placed(0, wood()).expect("valid slot");
        engine.drain_events();
        engine.on_item_placed(1, wood()).expect("valid slot");

        let events = engine.drain_events();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], CraftingOutput::SlotCleared { slot_index: 0 });
        assert_eq!(events[1], CraftingOutput::SlotCleared { slot_index: 1 });
        assert_eq!(
            events[2],
            CraftingOutput::ResultProduced {
                output: OutputId::new("Plank")
            }
        );
        assert!(matches!(events[3], CraftingOutput::MaterialsDestroyed { ref instances } if instances.len() == 2));
        assert!(matches!(events[4], CraftingOutput::MaterialsRespawned { .. }));
        assert_eq!(
            events[5],
            CraftingOutput::Crafted {
                recipe_id: RecipeId::new(1)
            }
        );
    }

    #[test]
    fn test_extra_item_prevents_match() {
        let mut engine = engine_with(plank_book());
        engine.on_item_placed(1, Item::new("Stone")).expect("valid slot");
        let outcome = engine.on_item_placed(0, wood()).expect("valid slot");

        assert_eq!(outcome.evaluation, Evaluation::NoMatch);
        assert_eq!(
            engine.grid().snapshot(),
            vec![
                Some(ItemType::new("Wood")),
                Some(ItemType::new("Stone")),
                None,
                None
            ]
        );
    }

    #[test]
    fn test_removal_reevaluates() {
        let mut engine = engine_with(plank_book());
        engine.on_item_placed(1, Item::new("Stone")).expect("valid slot");
        engine.on_item_placed(0, wood()).expect("valid slot");

        let outcome = engine.on_item_removed(1).expect("valid slot");
        assert_eq!(outcome.displaced, Some(Item::new("Stone")));
        assert_eq!(outcome.evaluation.recipe(), Some(RecipeId::new(2)));
        assert_eq!(engine.result().get(), Some(&OutputId::new("Stick")));
    }

    #[test]
    fn test_first_registered_recipe_crafts() {
        let first = Recipe::builder(RecipeId::new(5), "Chair", OutputId::new("Chair"))
            .tags(["Wood", "Wood", "", ""])
            .build();
        let second = Recipe::builder(RecipeId::new(6), "Table", OutputId::new("Table"))
            .tags(["Wood", "Wood", "", ""])
            .build();
        let book = Arc::new(RecipeBook::from_recipes([first, second]).expect("unique ids"));
        let mut engine = engine_with(book);

        engine.on_item_placed(0, wood()).expect("valid slot");
        engine.on_item_placed(1, wood()).expect("valid slot");
        assert_eq!(engine.result().get(), Some(&OutputId::new("Chair")));
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut engine = engine_with(plank_only_book());
        engine.on_item_placed(0, wood()).expect("valid slot");
        engine.drain_events();
        let before = engine.grid().snapshot();

        assert_eq!(
            engine.on_item_placed(4, wood()),
            Err(GridError::OutOfRange { index: 4, len: 4 })
        );
        assert_eq!(
            engine.on_item_removed(17),
            Err(GridError::OutOfRange { index: 17, len: 4 })
        );

        assert_eq!(engine.grid().snapshot(), before);
        assert_eq!(engine.pending_events(), 0);
        assert_eq!(engine.stats().rejected_operations, 2);
    }

    #[test]
    fn test_empty_tag_leaves_slot_empty() {
        let mut engine = engine_with(plank_book());

        let rejected = engine.handle(CraftingInput::ItemPlaced {
            slot_index: 1,
            item_type: ItemType::new(""),
        });
        assert_eq!(rejected, Err(GridError::EmptyItemType { index: 1 }));
        assert!(engine.grid().is_empty());
        assert_eq!(engine.pending_events(), 0);
        assert_eq!(engine.stats().rejected_operations, 1);

        let outcome = engine.on_item_placed(0, wood()).expect("valid slot");
        assert_eq!(outcome.evaluation.recipe(), Some(RecipeId::new(2)));
        assert_eq!(engine.take_result(), Some(OutputId::new("Stick")));
    }

    #[test]
    fn test_swap_returns_evicted_item() {
        let mut engine = engine_with(plank_only_book());
        engine.on_item_placed(0, Item::new("Stone")).expect("valid slot");
        engine.drain_events();

        let outcome = engine.on_item_placed(0, wood()).expect("valid slot");
        assert_eq!(outcome.displaced, Some(Item::new("Stone")));
        assert_eq!(
            engine.drain_events(),
            vec![
                CraftingOutput::ItemReturnedToOrigin {
                    item: Item::new("Stone"),
                    slot_index: 0
                },
                CraftingOutput::NoMatch
            ]
        );
    }

    #[test]
    fn test_reject_policy() {
        let grid = CraftingGrid::default().with_policy(OccupiedPolicy::Reject);
        let mut engine =
            CraftingEngine::new(grid, plank_only_book(), MaterialSupply::new(manifest()))
                .expect("valid configuration");

        engine.on_item_placed(0, Item::new("Stone")).expect("empty slot");
        assert_eq!(
            engine.on_item_placed(0, wood()),
            Err(GridError::SlotOccupied { index: 0 })
        );
        assert_eq!(engine.grid().get(0), Some(&Item::new("Stone")));
    }

    #[test]
    fn test_stale_result_cleared_on_next_evaluation() {
        let mut engine = engine_with(plank_only_book());
        engine.on_item_placed(0, wood()).expect("valid slot");
        engine.on_item_placed(1, wood()).expect("valid slot");
        engine.drain_events();

        engine.on_item_placed(3, Item::new("Stone")).expect("valid slot");
        assert!(engine.result().is_empty());
        assert_eq!(
            engine.drain_events(),
            vec![
                CraftingOutput::ResultCleared {
                    output: OutputId::new("Plank")
                },
                CraftingOutput::NoMatch
            ]
        );
    }

    #[test]
    fn test_take_result() {
        let mut engine = engine_with(plank_only_book());
        engine.on_item_placed(0, wood()).expect("valid slot");
        engine.on_item_placed(1, wood()).expect("valid slot");

        assert_eq!(engine.take_result(), Some(OutputId::new("Plank")));
        assert!(engine.result().is_empty());
        assert_eq!(engine.take_result(), None);
    }

    #[test]
    fn test_manual_craft_matches_placement_evaluation() {
        let mut engine = engine_with(plank_only_book());
        engine.on_item_placed(0, wood()).expect("valid slot");

        assert_eq!(engine.try_craft_manual(), Evaluation::NoMatch);
        assert_eq!(engine.try_craft_manual(), Evaluation::NoMatch);
        assert_eq!(engine.grid().occupied_count(), 1);
        assert_eq!(engine.stats().evaluations, 3);
    }

    #[test]
    fn test_missing_supply_target_does_not_block_craft() {
        let mut engine = CraftingEngine::new(
            CraftingGrid::default(),
            plank_only_book(),
            MaterialSupply::without_target(manifest()),
        )
        .expect("valid configuration");
        assert!(matches!(
            engine.drain_events().as_slice(),
            [CraftingOutput::RespawnSkipped { .. }]
        ));

        engine.on_item_placed(0, wood()).expect("valid slot");
        let outcome = engine.on_item_placed(1, wood()).expect("valid slot");

        match outcome.evaluation {
            Evaluation::Crafted { respawn, .. } => {
                assert_eq!(respawn, Err(SupplyError::MissingSupplyTarget));
            },
            Evaluation::NoMatch => panic!("expected a craft"),
        }
        assert_eq!(engine.result().get(), Some(&OutputId::new("Plank")));
        assert_eq!(engine.stats().respawns_skipped, 2);
        assert!(engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, CraftingOutput::Crafted { .. })));
    }

    #[test]
    fn test_handle_dispatch() {
        let mut engine = engine_with(plank_only_book());
        engine
            .handle(CraftingInput::ItemPlaced {
                slot_index: 0,
                item_type: ItemType::new("Wood"),
            })
            .expect("valid slot");
        let removed = engine
            .handle(CraftingInput::ItemRemoved { slot_index: 0 })
            .expect("valid slot");
        assert_eq!(removed.displaced, Some(wood()));

        let manual = engine
            .handle(CraftingInput::ManualCraftRequested)
            .expect("manual craft never fails");
        assert_eq!(manual.evaluation, Evaluation::NoMatch);
        assert_eq!(engine.stats().no_matches, 3);
    }

    #[test]
    fn test_place_at_coordinate() {
        let mut engine = engine_with(plank_only_book());
        engine
            .on_item_placed_at(SlotCoord::new(0, 0), wood())
            .expect("inside grid");
        let outcome = engine
            .on_item_placed_at(SlotCoord::new(1, 0), wood())
            .expect("inside grid");
        assert!(outcome.evaluation.is_crafted());

        assert!(engine.on_item_placed_at(SlotCoord::new(2, 0), wood()).is_err());
    }

    #[test]
    fn test_take_material() {
        let mut engine = engine_with(plank_only_book());
        let id = engine.supply().pool().expect("attached").instances()[0].id;
        let taken = engine.take_material(id).expect("in pool");
        assert_eq!(taken.item_type, ItemType::new("Wood"));
        assert!(engine.take_material(id).is_none());
    }

    fn arb_input() -> impl Strategy<Value = CraftingInput> {
        prop_oneof![
            (0usize..6, proptest::sample::select(vec!["Wood", "Stone"])).prop_map(|(slot_index, tag)| {
                CraftingInput::ItemPlaced {
                    slot_index,
                    item_type: ItemType::new(tag),
                }
            }),
            (0usize..6).prop_map(|slot_index| CraftingInput::ItemRemoved { slot_index }),
            Just(CraftingInput::ManualCraftRequested),
        ]
    }

    proptest! {
        #[test]
        fn prop_craft_consumes_everything(inputs in proptest::collection::vec(arb_input(), 1..40)) {
            let mut engine = engine_with(plank_book());
            for input in inputs {
                let before = engine.grid().snapshot();
                match engine.handle(input) {
                    Ok(outcome) => {
                        if let Evaluation::Crafted { output, .. } = &outcome.evaluation {
                            prop_assert_eq!(engine.grid().occupied_count(), 0);
                            prop_assert_eq!(engine.result().get(), Some(output));
                        } else {
                            prop_assert!(engine.result().is_empty());
                        }
                    },
                    Err(_) => {
                        prop_assert_eq!(engine.grid().snapshot(), before);
                    },
                }
                prop_assert_eq!(engine.grid().len(), 4);
                prop_assert_eq!(engine.state(), EngineState::Idle);
            }
        }
    }
}
