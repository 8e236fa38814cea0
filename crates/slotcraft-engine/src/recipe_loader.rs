//! Recipe catalog loading and load-time validation.
//!
//! This module provides:
//! - Loading catalogs from `assets/recipes/*.toml` and `*.ron`
//! - Deterministic merge order (files sorted by name)
//! - Validation of patterns, outputs, ingredients and the supply manifest
//! - Conversion into an immutable [`RecipeBook`] and a [`MaterialSupply`]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};
use slotcraft_common::{
    ConfigError, ConfigResult, GridDimensions, ItemType, OutputId, RecipeId, SchemaVersion,
};
use slotcraft_gameplay::{MaterialSupply, PatternSlot, Recipe, RecipeBook};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default asset path for recipes.
pub const DEFAULT_RECIPE_PATH: &str = "assets/recipes";

/// Errors that can occur during catalog loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Path does not exist.
    #[error("Recipe path not found: {0}")]
    NotFound(PathBuf),

    /// File extension is neither `toml` nor `ron`.
    #[error("Unknown catalog format: {0}")]
    UnknownFormat(PathBuf),

    /// Failed to read file.
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to parse RON.
    #[error("Failed to parse catalog RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Catalog content is invalid.
    #[error("Invalid catalog: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for catalog loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Catalog file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// `*.toml`
    Toml,
    /// `*.ron`
    Ron,
}

impl CatalogFormat {
    /// Detects the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }
}

/// A declared output descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDefinition {
    /// Descriptor resolved by the presentation layer.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A recipe definition loaded from file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDefinition {
    /// Unique recipe identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// One entry per grid slot, row-major. `""` or `None` means empty.
    pub pattern: Vec<Option<String>>,
    /// Output descriptor.
    pub output: String,
}

impl RecipeDefinition {
    /// Validates fields that do not depend on the rest of the catalog.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName(self.id));
        }
        Ok(())
    }

    /// Converts to a gameplay recipe.
    #[must_use]
    pub fn to_gameplay_recipe(&self) -> Recipe {
        Recipe {
            id: RecipeId::new(self.id),
            name: self.name.clone(),
            pattern: self
                .pattern
                .iter()
                .map(|entry| PatternSlot::from(entry.as_deref().and_then(ItemType::parse)))
                .collect(),
            output: OutputId::new(self.output.as_str()),
        }
    }
}

/// Contents of a single catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Declared material types.
    #[serde(default)]
    pub items: Vec<String>,
    /// Declared outputs.
    #[serde(default)]
    pub outputs: Vec<OutputDefinition>,
    /// Material types the supply keeps available.
    #[serde(default)]
    pub manifest: Vec<String>,
    /// Recipes in priority order.
    #[serde(default)]
    pub recipes: Vec<RecipeDefinition>,
}

fn default_version() -> String {
    SchemaVersion::CRAFTING_CATALOG.to_string()
}

impl RecipeFile {
    /// Parses catalog text in the given format.
    pub fn parse(content: &str, format: CatalogFormat) -> LoadResult<Self> {
        let file: Self = match format {
            CatalogFormat::Toml => toml::from_str(content)?,
            CatalogFormat::Ron => ron::Options::default()
                .with_default_extension(Extensions::IMPLICIT_SOME)
                .from_str(content)?,
        };
        Ok(file)
    }

    /// Checks that this build can read the file's schema version.
    pub fn check_version(&self) -> ConfigResult<SchemaVersion> {
        let found = SchemaVersion::from_str(&self.version)?;
        if SchemaVersion::CRAFTING_CATALOG.can_read(&found) {
            Ok(found)
        } else {
            Err(ConfigError::UnsupportedVersion {
                found: found.to_string(),
                supported: SchemaVersion::CRAFTING_CATALOG.to_string(),
            })
        }
    }
}

/// Merged catalog: declared items and outputs, the supply manifest and the
/// recipes in registration order.
#[derive(Debug, Clone, Default)]
pub struct CraftingCatalog {
    items: BTreeSet<ItemType>,
    outputs: BTreeMap<OutputId, Option<String>>,
    manifest: Vec<ItemType>,
    recipes: Vec<RecipeDefinition>,
}

impl CraftingCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a file's contents after the ones already merged.
    pub fn merge(&mut self, file: RecipeFile) -> ConfigResult<()> {
        file.check_version()?;

        for tag in &file.items {
            match ItemType::parse(tag) {
                Some(item) => {
                    self.items.insert(item);
                },
                None => warn!("Ignoring empty item declaration"),
            }
        }
        for output in file.outputs {
            self.outputs
                .insert(OutputId::new(output.id), output.name);
        }
        self.manifest
            .extend(file.manifest.iter().map(|tag| ItemType::new(tag.as_str())));
        self.recipes.extend(file.recipes);
        Ok(())
    }

    /// Declared material types.
    #[must_use]
    pub fn items(&self) -> &BTreeSet<ItemType> {
        &self.items
    }

    /// Whether `output` is declared.
    #[must_use]
    pub fn has_output(&self, output: &OutputId) -> bool {
        self.outputs.contains_key(output)
    }

    /// Display name of an output, if one was given.
    #[must_use]
    pub fn output_name(&self, output: &OutputId) -> Option<&str> {
        self.outputs.get(output)?.as_deref()
    }

    /// Supply manifest in declaration order.
    #[must_use]
    pub fn manifest(&self) -> &[ItemType] {
        &self.manifest
    }

    /// Recipe definitions in registration order.
    #[must_use]
    pub fn recipes(&self) -> &[RecipeDefinition] {
        &self.recipes
    }

    fn validate_manifest(&self) -> ConfigResult<()> {
        match self.manifest.iter().find(|tag| !self.items.contains(*tag)) {
            Some(tag) => Err(ConfigError::UndefinedMaterial(tag.clone())),
            None => Ok(()),
        }
    }

    fn validate_recipe(&self, recipe: &Recipe, slot_count: usize) -> ConfigResult<()> {
        recipe.validate_length(slot_count)?;

        if !self.has_output(&recipe.output) {
            return Err(ConfigError::UndefinedOutput {
                recipe: recipe.id,
                output: recipe.output.clone(),
            });
        }

        match recipe
            .required_items()
            .into_iter()
            .find(|item| !self.items.contains(*item))
        {
            Some(item) => Err(ConfigError::UndefinedIngredient {
                recipe: recipe.id,
                item: item.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Validates every recipe and the manifest, then builds the book.
    ///
    /// Fails on the first configuration error.
    pub fn build_book(&self, dimensions: GridDimensions) -> ConfigResult<RecipeBook> {
        let slot_count = dimensions.slot_count();
        let mut book = RecipeBook::new();

        for definition in &self.recipes {
            definition.validate()?;
            let recipe = definition.to_gameplay_recipe();
            self.validate_recipe(&recipe, slot_count)?;
            book.register(recipe)?;
        }
        self.validate_manifest()?;

        info!(
            "Built recipe book with {} recipes for {}x{} grid",
            book.len(),
            dimensions.width(),
            dimensions.height()
        );
        Ok(book)
    }

    /// Builds the material supply. With `enabled == false` no free pool is
    /// attached and every respawn is skipped.
    pub fn build_supply(&self, enabled: bool) -> ConfigResult<MaterialSupply> {
        self.validate_manifest()?;
        let manifest = self.manifest.clone();
        Ok(if enabled {
            MaterialSupply::new(manifest)
        } else {
            MaterialSupply::without_target(manifest)
        })
    }
}

/// Statistics for the catalog loader.
#[derive(Debug, Default, Clone)]
pub struct RecipeLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of recipe definitions read.
    pub recipes_loaded: u32,
    /// Number of files skipped for an unknown extension.
    pub files_skipped: u32,
}

/// Catalog loader.
#[derive(Debug)]
pub struct RecipeLoader {
    /// Catalog file or directory.
    base_path: PathBuf,
    /// Merged catalog.
    catalog: CraftingCatalog,
    /// Statistics.
    stats: RecipeLoaderStats,
}

impl RecipeLoader {
    /// Creates a new catalog loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Initializing recipe loader at: {:?}", base_path);

        Self {
            base_path,
            catalog: CraftingCatalog::new(),
            stats: RecipeLoaderStats::default(),
        }
    }

    /// Creates a loader with default path.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(DEFAULT_RECIPE_PATH)
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the merged catalog.
    #[must_use]
    pub fn catalog(&self) -> &CraftingCatalog {
        &self.catalog
    }

    /// Consumes the loader, returning the merged catalog.
    #[must_use]
    pub fn into_catalog(self) -> CraftingCatalog {
        self.catalog
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &RecipeLoaderStats {
        &self.stats
    }

    /// Loads the base path: a single catalog file, or every catalog file in a
    /// directory in filename order. Any error aborts the load.
    pub fn load_all(&mut self) -> LoadResult<()> {
        if !self.base_path.exists() {
            return Err(LoadError::NotFound(self.base_path.clone()));
        }

        if self.base_path.is_file() {
            let path = self.base_path.clone();
            self.load_file(&path)?;
        } else {
            let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_path)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<_, _>>()?;
            paths.sort();

            for path in paths {
                if !path.is_file() {
                    continue;
                }
                if CatalogFormat::from_path(&path).is_none() {
                    debug!("Skipping non-catalog file {:?}", path);
                    self.stats.files_skipped += 1;
                    continue;
                }
                self.load_file(&path)?;
            }
        }

        info!(
            "Loaded {} recipes from {} files",
            self.stats.recipes_loaded, self.stats.files_loaded
        );

        Ok(())
    }

    /// Loads and merges a single catalog file.
    pub fn load_file(&mut self, path: &Path) -> LoadResult<()> {
        debug!("Loading catalog file: {:?}", path);

        let format =
            CatalogFormat::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.into()))?;
        let content = fs::read_to_string(path)?;
        let file = RecipeFile::parse(&content, format)?;

        let count = file.recipes.len() as u32;
        self.catalog.merge(file)?;

        self.stats.files_loaded += 1;
        self.stats.recipes_loaded += count;
        debug!("Loaded {} recipes from {:?}", count, path);

        Ok(())
    }
}
