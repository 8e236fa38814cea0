//! # Slotcraft Engine
//!
//! Runtime wiring around the crafting state engine.
//!
//! This crate provides:
//! - Engine configuration (`slotcraft.toml`)
//! - Recipe catalog loading and load-time validation
//! - Logging initialisation
//! - A FIFO crafting session and a mutex-guarded shared engine

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod logging;
pub mod recipe_loader;
pub mod session;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::logging::*;
    pub use crate::recipe_loader::*;
    pub use crate::session::*;
}

pub use prelude::*;

/// Engine version from the package manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use slotcraft_common::{ItemType, OutputId};
    use slotcraft_gameplay::CraftingInput;
    use std::path::PathBuf;

    fn bundled_recipes() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/recipes")
    }

    #[test]
    fn test_bundled_catalog_is_valid() {
        let config = EngineConfig {
            recipe_path: bundled_recipes(),
            ..EngineConfig::default()
        };
        let mut session = CraftingSession::from_config(&config).expect("bundled catalog");

        let sender = session.sender();
        for slot_index in [0, 2] {
            sender
                .send(CraftingInput::ItemPlaced {
                    slot_index,
                    item_type: ItemType::new("Wood"),
                })
                .expect("inbox open");
        }
        session.process_pending();

        assert_eq!(
            session.engine_mut().take_result(),
            Some(OutputId::new("Stick"))
        );
    }
}
