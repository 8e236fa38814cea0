//! Engine configuration.
//!
//! Provides grid geometry, drop policy, catalog location, supply and logging
//! settings, read from and written to a TOML file such as `slotcraft.toml`.

use serde::{Deserialize, Serialize};
use slotcraft_common::{ConfigResult, GridDimensions, MAX_GRID_DIMENSION};
use slotcraft_gameplay::OccupiedPolicy;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::recipe_loader::DEFAULT_RECIPE_PATH;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Plain,
    /// One JSON object per event
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, extended by `RUST_LOG`
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "slotcraft=info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Grid Settings ===
    /// Grid width in slots
    pub grid_width: u8,
    /// Grid height in slots
    pub grid_height: u8,
    /// What to do when an item is dropped onto an occupied slot
    pub occupied_policy: OccupiedPolicy,

    // === Catalog Settings ===
    /// Catalog file or directory of catalog files
    pub recipe_path: PathBuf,

    // === Supply Settings ===
    /// Whether a free pool exists to receive respawned materials
    pub supply_enabled: bool,

    // === Event Settings ===
    /// Outbound event bus capacity (0 = unbounded)
    pub event_capacity: usize,

    // === Logging ===
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Grid
            grid_width: 2,
            grid_height: 2,
            occupied_policy: OccupiedPolicy::Swap,

            // Catalog
            recipe_path: PathBuf::from(DEFAULT_RECIPE_PATH),

            // Supply
            supply_enabled: true,

            // Events
            event_capacity: 0,

            // Logging
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Reads a configuration file and clamps it with [`Self::validate`].
    ///
    /// A missing or unparsable file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Self::default();
            },
            Err(err) => {
                warn!("Failed to read config {}: {}", path.display(), err);
                return Self::default();
            },
        };

        let mut config: Self = match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring malformed config {}: {}", path.display(), err);
                return Self::default();
            },
        };
        config.validate();
        info!(
            "Engine config from {}: {}x{} grid, catalog {}",
            path.display(),
            config.grid_width,
            config.grid_height,
            config.recipe_path.display()
        );
        config
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        debug!("Wrote engine config to {}", path.display());
        Ok(())
    }

    /// Clamps grid axes into `1..=MAX_GRID_DIMENSION` and restores an empty
    /// log filter to its default.
    pub fn validate(&mut self) {
        self.grid_width = self.grid_width.clamp(1, MAX_GRID_DIMENSION);
        self.grid_height = self.grid_height.clamp(1, MAX_GRID_DIMENSION);

        if self.logging.filter.trim().is_empty() {
            self.logging.filter = LoggingConfig::default().filter;
        }
    }

    /// Grid geometry described by this configuration.
    pub fn dimensions(&self) -> ConfigResult<GridDimensions> {
        GridDimensions::new(self.grid_width, self.grid_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotcraft_common::ConfigError;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.grid_width, 2);
        assert_eq!(config.grid_height, 2);
        assert_eq!(config.occupied_policy, OccupiedPolicy::Swap);
        assert!(config.supply_enabled);
        assert_eq!(config.event_capacity, 0);
        assert_eq!(config.logging.filter, "slotcraft=info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.grid_width = 0;
        config.grid_height = 40;
        config.logging.filter = "  ".to_string();

        config.validate();

        assert_eq!(config.grid_width, 1);
        assert_eq!(config.grid_height, MAX_GRID_DIMENSION);
        assert_eq!(config.logging.filter, "slotcraft=info");
    }

    #[test]
    fn test_config_dimensions() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.dimensions().expect("default is valid").slot_count(),
            4
        );

        config.grid_width = 0;
        assert!(matches!(
            config.dimensions(),
            Err(ConfigError::InvalidGrid { width: 0, .. })
        ));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = EngineConfig::default();
        config.grid_width = 3;
        config.grid_height = 3;
        config.occupied_policy = OccupiedPolicy::Reject;
        config.logging.format = LogFormat::Json;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/config.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "grid_width = \"wide\"").expect("write");

        assert_eq!(EngineConfig::load_from(&config_path), EngineConfig::default());
    }

    #[test]
    fn test_config_load_clamps_values() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("slotcraft.toml");
        fs::write(&config_path, "grid_width = 0\ngrid_height = 200\n").expect("write");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.grid_width, 1);
        assert_eq!(loaded.grid_height, MAX_GRID_DIMENSION);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
grid_width = 3
occupied_policy = "reject"

[logging]
format = "json"
"#,
        )
        .expect("parse");

        assert_eq!(config.grid_width, 3);
        assert_eq!(config.grid_height, 2);
        assert_eq!(config.occupied_policy, OccupiedPolicy::Reject);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "slotcraft=info");
    }
}
