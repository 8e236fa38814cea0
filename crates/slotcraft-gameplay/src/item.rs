//! Placeable material items.

use serde::{Deserialize, Serialize};
use slotcraft_common::ItemType;

/// A concrete material placed by the player.
///
/// Items are immutable and carry no identity beyond their type tag: equality is
/// by tag, so two items of the same type are interchangeable for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    item_type: ItemType,
}

impl Item {
    /// Creates an item of the given type.
    #[must_use]
    pub fn new(item_type: impl Into<ItemType>) -> Self {
        Self {
            item_type: item_type.into(),
        }
    }

    /// Returns the item's type tag.
    #[must_use]
    pub fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    /// Consumes the item, returning its type tag.
    #[must_use]
    pub fn into_type(self) -> ItemType {
        self.item_type
    }
}

impl From<ItemType> for Item {
    fn from(item_type: ItemType) -> Self {
        Self { item_type }
    }
}
