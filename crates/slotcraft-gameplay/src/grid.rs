//! Crafting grid: a fixed-size, row-major array of item slots.
//!
//! The grid enforces two invariants for its whole lifetime:
//! - it always has exactly `N = width * height` slots
//! - a slot's occupant only changes through [`CraftingGrid::place`],
//!   [`CraftingGrid::clear`] or [`CraftingGrid::clear_all`]
//!
//! Every failed mutation leaves the grid exactly as it was. The grid never
//! destroys an item: evicted and cleared occupants are handed back to the
//! caller for disposition.

use serde::{Deserialize, Serialize};
use slotcraft_common::{GridDimensions, GridError, GridResult, ItemType, SlotCoord};

use crate::item::Item;

/// Read-only view of the grid used for recipe matching.
///
/// Always has one entry per slot, `None` for empty slots.
pub type Snapshot = Vec<Option<ItemType>>;

/// What happens when an item is dropped onto an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupiedPolicy {
    /// Evict the previous occupant back to its origin, then place.
    #[default]
    Swap,
    /// Refuse the drop with [`GridError::SlotOccupied`].
    Reject,
}

/// The crafting grid.
#[derive(Debug, Clone)]
pub struct CraftingGrid {
    /// Grid geometry.
    dimensions: GridDimensions,
    /// Slots in row-major order.
    slots: Vec<Option<Item>>,
    /// Occupied-slot drop policy.
    policy: OccupiedPolicy,
}

impl Default for CraftingGrid {
    fn default() -> Self {
        Self::new(GridDimensions::default())
    }
}

impl CraftingGrid {
    /// Creates an empty grid with the default swap policy.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            slots: vec![None; dimensions.slot_count()],
            policy: OccupiedPolicy::default(),
        }
    }

    /// Sets the occupied-slot policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: OccupiedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Grid geometry.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Occupied-slot policy.
    #[must_use]
    pub const fn policy(&self) -> OccupiedPolicy {
        self.policy
    }

    /// Number of slots (N).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot holds an item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns the occupant of a slot, or `None` if empty or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterates over all slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Item>> + '_ {
        self.slots.iter().map(Option::as_ref)
    }

    fn check_index(&self, index: usize) -> GridResult<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(GridError::OutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }

    /// Places an item into a slot.
    ///
    /// Returns the previous occupant, if any, so the caller can return it to
    /// its origin. With [`OccupiedPolicy::Reject`] an occupied slot fails with
    /// [`GridError::SlotOccupied`] instead.
    pub fn place(&mut self, index: usize, item: Item) -> GridResult<Option<Item>> {
        self.check_index(index)?;
        if item.item_type().is_empty() {
            return Err(GridError::EmptyItemType { index });
        }

        if self.slots[index].is_some() && self.policy == OccupiedPolicy::Reject {
            return Err(GridError::SlotOccupied { index });
        }

        Ok(self.slots[index].replace(item))
    }

    /// Places an item at a row-major coordinate.
    pub fn place_at(&mut self, coord: SlotCoord, item: Item) -> GridResult<Option<Item>> {
        let index = self.index_of(coord)?;
        self.place(index, item)
    }

    /// Empties a slot, returning its occupant.
    pub fn clear(&mut self, index: usize) -> GridResult<Option<Item>> {
        self.check_index(index)?;
        Ok(self.slots[index].take())
    }

    /// Empties every slot.
    ///
    /// Returns the removed items paired with their slot index, in index order.
    /// All slots are empty when this returns.
    pub fn clear_all(&mut self) -> Vec<(usize, Item)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.take().map(|item| (index, item)))
            .collect()
    }

    /// Takes a read-only snapshot of slot contents.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|item| item.item_type().clone()))
            .collect()
    }

    /// Converts a row-major coordinate to a slot index.
    pub fn index_of(&self, coord: SlotCoord) -> GridResult<usize> {
        self.dimensions
            .index_of(coord)
            .ok_or(GridError::CoordOutOfRange {
                x: coord.x,
                y: coord.y,
                width: self.dimensions.width(),
                height: self.dimensions.height(),
            })
    }
}
