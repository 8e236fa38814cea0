//! # Slotcraft Common
//!
//! Common types and shared abstractions for Slotcraft.
//!
//! This crate provides the foundational types used by every Slotcraft crate:
//! - Value types for material tags, output descriptors and recipe IDs
//! - Grid geometry (dimensions and row-major slot coordinates)
//! - Version information for catalog schemas
//! - The shared error taxonomy
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
