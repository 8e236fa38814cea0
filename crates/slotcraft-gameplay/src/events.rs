//! Inbound and outbound crafting events, and the outbound event bus.
//!
//! The UI layer reports discrete input events ([`CraftingInput`]) and receives
//! commands back ([`CraftingOutput`]) through an [`EventBus`] owned by the
//! engine.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use slotcraft_common::{InstanceId, ItemType, OutputId, RecipeId};
use tracing::warn;

use crate::item::Item;

/// Events reported to the engine by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftingInput {
    /// An item was dropped into a slot
    ItemPlaced {
        /// Target slot
        slot_index: usize,
        /// Type of the dropped item
        item_type: ItemType,
    },
    /// An item was dragged out of a slot
    ItemRemoved {
        /// Source slot
        slot_index: usize,
    },
    /// The player pressed the craft button
    ManualCraftRequested,
}

/// Commands sent from the engine to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftingOutput {
    /// Destroy the visual in a grid slot
    SlotCleared {
        /// Cleared slot
        slot_index: usize,
    },
    /// Instantiate the crafted visual in the result slot
    ResultProduced {
        /// What was crafted
        output: OutputId,
    },
    /// Remove a stale visual from the result slot
    ResultCleared {
        /// What was removed
        output: OutputId,
    },
    /// Send an evicted item back to where it was dragged from
    ItemReturnedToOrigin {
        /// Evicted item
        item: Item,
        /// Slot it was evicted from
        slot_index: usize,
    },
    /// Destroy free-pool visuals before respawning
    MaterialsDestroyed {
        /// Destroyed instances
        instances: Vec<InstanceId>,
    },
    /// Instantiate fresh free-pool visuals
    MaterialsRespawned {
        /// Spawned types in manifest order
        item_types: Vec<ItemType>,
        /// Spawned instances, parallel to `item_types`
        instances: Vec<InstanceId>,
    },
    /// Respawn could not run
    RespawnSkipped {
        /// Why
        reason: String,
    },
    /// A recipe was crafted
    Crafted {
        /// Matched recipe
        recipe_id: RecipeId,
    },
    /// Evaluation finished without a match
    NoMatch,
}

/// Outbound event channel.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for publishing events
    sender: Sender<CraftingOutput>,
    /// Receiver for collecting events
    receiver: Receiver<CraftingOutput>,
    /// Channel capacity (`None` = unbounded)
    capacity: Option<usize>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl EventBus {
    /// Creates an unbounded bus.
    #[must_use]
    pub fn unbounded() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            capacity: None,
        }
    }

    /// Creates a bounded bus. A capacity of zero means unbounded.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::unbounded();
        }
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity: Some(capacity),
        }
    }

    /// Publishes an event. When a bounded bus is full the event is dropped.
    pub fn publish(&self, event: CraftingOutput) {
        match self.sender.try_send(event) {
            Ok(()) => {},
            Err(TrySendError::Full(event)) => {
                warn!("Event bus full, dropping {:?}", event);
            },
            Err(TrySendError::Disconnected(event)) => {
                warn!("Event bus disconnected, dropping {:?}", event);
            },
        }
    }

    /// Drains all pending events in publish order.
    pub fn drain(&self) -> Vec<CraftingOutput> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<CraftingOutput> {
        self.sender.clone()
    }
}

/// Receives outbound events on behalf of the UI layer.
pub trait OutputHandler: Send + Sync {
    /// Handles one event.
    fn handle(&self, event: &CraftingOutput);
}
