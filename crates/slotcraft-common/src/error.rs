//! Error types for Slotcraft.
//!
//! Errors fall into two families:
//! - Configuration errors are fatal and surface while the recipe catalog,
//!   manifest and grid are being loaded.
//! - Operational errors (grid and supply) are non-fatal: the failed operation
//!   leaves state untouched and everything else keeps working.
//!
//! Absence of a matching recipe is not an error.

use thiserror::Error;

use crate::ids::{ItemType, OutputId, RecipeId};

/// Top-level error type for Slotcraft operations.
#[derive(Debug, Error)]
pub enum SlotcraftError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Grid mutation errors
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Material supply errors
    #[error("Supply error: {0}")]
    Supply(#[from] SupplyError),
}

/// Load-time configuration errors. These abort startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Grid dimensions outside the supported range
    #[error("Invalid grid dimensions {width}x{height}")]
    InvalidGrid {
        /// Requested width
        width: u8,
        /// Requested height
        height: u8,
    },

    /// Recipe pattern length differs from the grid's slot count
    #[error("Recipe {recipe} has {actual} pattern entries, grid has {expected} slots")]
    PatternLength {
        /// Offending recipe
        recipe: RecipeId,
        /// Grid slot count
        expected: usize,
        /// Pattern length found
        actual: usize,
    },

    /// Recipe produces an output that is not declared
    #[error("Recipe {recipe} references undefined output '{output}'")]
    UndefinedOutput {
        /// Offending recipe
        recipe: RecipeId,
        /// Output descriptor
        output: OutputId,
    },

    /// Recipe requires an item type that is not declared
    #[error("Recipe {recipe} requires undefined item type '{item}'")]
    UndefinedIngredient {
        /// Offending recipe
        recipe: RecipeId,
        /// Item type
        item: ItemType,
    },

    /// Supply manifest references an item type that is not declared
    #[error("Manifest references undefined item type '{0}'")]
    UndefinedMaterial(ItemType),

    /// Two recipes share an ID
    #[error("Duplicate recipe ID: {0}")]
    DuplicateRecipeId(u32),

    /// Recipe without a name
    #[error("Recipe {0} has empty name")]
    EmptyName(u32),

    /// Malformed schema version string
    #[error("Invalid schema version '{0}'")]
    InvalidVersion(String),

    /// Catalog written for an incompatible schema
    #[error("Unsupported catalog version {found}, supported {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: String,
        /// Version this build reads
        supported: String,
    },
}

/// Grid mutation errors. The grid is unchanged when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Slot index outside `[0, len)`
    #[error("Slot index {index} out of range (grid has {len} slots)")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Grid slot count
        len: usize,
    },

    /// Coordinate outside the grid
    #[error("Coordinate ({x}, {y}) outside {width}x{height} grid")]
    CoordOutOfRange {
        /// Column
        x: u8,
        /// Row
        y: u8,
        /// Grid width
        width: u8,
        /// Grid height
        height: u8,
    },

    /// Item with an empty type tag; an empty tag denotes an empty slot
    #[error("Slot {index} cannot hold an item with an empty type tag")]
    EmptyItemType {
        /// Requested index
        index: usize,
    },

    /// Target slot is occupied and the grid rejects drops onto occupied slots
    #[error("Slot {index} is already occupied")]
    SlotOccupied {
        /// Requested index
        index: usize,
    },
}

/// Material supply errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SupplyError {
    /// No free pool is attached to receive respawned materials
    #[error("No material supply target configured")]
    MissingSupplyTarget,
}

/// Result type for configuration and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for grid mutations.
pub type GridResult<T> = Result<T, GridError>;

/// Result type for supply operations.
pub type SupplyResult<T> = Result<T, SupplyError>;
