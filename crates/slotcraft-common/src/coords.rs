//! Grid geometry: dimensions and row-major slot coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Maximum supported grid dimension.
pub const MAX_GRID_DIMENSION: u8 = 9;

/// Position of a slot inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotCoord {
    /// Column
    pub x: u8,
    /// Row
    pub y: u8,
}

impl SlotCoord {
    /// Creates a new slot coordinate.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Width and height of a crafting grid.
///
/// Slots are laid out in row-major order, so index `i` encodes the slot's role
/// in a recipe pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    width: u8,
    height: u8,
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::inventory()
    }
}

impl GridDimensions {
    /// Creates validated grid dimensions.
    pub fn new(width: u8, height: u8) -> ConfigResult<Self> {
        if width == 0 || height == 0 || width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION
        {
            return Err(ConfigError::InvalidGrid { width, height });
        }
        Ok(Self { width, height })
    }

    /// 2x2 grid.
    #[must_use]
    pub const fn inventory() -> Self {
        Self {
            width: 2,
            height: 2,
        }
    }

    /// 3x3 grid.
    #[must_use]
    pub const fn workbench() -> Self {
        Self {
            width: 3,
            height: 3,
        }
    }

    /// Grid width.
    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    /// Grid height.
    #[must_use]
    pub const fn height(self) -> u8 {
        self.height
    }

    /// Total number of slots (N).
    #[must_use]
    pub const fn slot_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Checks whether `index` addresses a slot.
    #[must_use]
    pub const fn contains_index(self, index: usize) -> bool {
        index < self.slot_count()
    }

    /// Converts a coordinate to a linear slot index.
    #[must_use]
    pub const fn index_of(self, coord: SlotCoord) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            Some((coord.y as usize) * (self.width as usize) + (coord.x as usize))
        } else {
            None
        }
    }

    /// Converts a linear slot index to a coordinate.
    #[must_use]
    pub const fn coord_of(self, index: usize) -> Option<SlotCoord> {
        if !self.contains_index(index) {
            return None;
        }
        let width = self.width as usize;
        Some(SlotCoord {
            x: (index % width) as u8,
            y: (index / width) as u8,
        })
    }
}
