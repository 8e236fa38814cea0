//! # Slotcraft Gameplay
//!
//! The crafting state engine.
//!
//! This crate provides:
//! - Items and the fixed-size crafting grid
//! - Positional recipes and the ordered recipe book
//! - The material supply that restocks the free pool after each craft
//! - The crafting engine state machine and its result slot
//! - Inbound/outbound events and the outbound event bus
//! - Crafting statistics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod crafting;
pub mod events;
pub mod grid;
pub mod item;
pub mod recipes;
pub mod stats;
pub mod supply;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crafting::*;
    pub use crate::events::*;
    pub use crate::grid::*;
    pub use crate::item::*;
    pub use crate::recipes::*;
    pub use crate::stats::*;
    pub use crate::supply::*;
}

pub use prelude::*;
