//! Recipe definitions and positional matching.
//!
//! This module provides:
//! - Fixed-length patterns of [`PatternSlot`]s over the whole grid
//! - Strict positional matching with explicit empty-slot semantics
//! - An ordered [`RecipeBook`] where the first registered match wins
//!
//! Matching is positional, not multiset: a recipe requiring `Wood` at index 0
//! does not match a grid holding `Wood` at index 1.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use slotcraft_common::{ConfigError, ConfigResult, ItemType, OutputId, RecipeId};
use std::fmt;
use tracing::{debug, trace};

// ============================================================================
// Pattern slots
// ============================================================================

/// One position of a recipe pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PatternSlot {
    /// Slot must be unoccupied.
    #[default]
    Empty,
    /// Slot must hold exactly this type.
    Required(ItemType),
}

impl PatternSlot {
    /// Parses a pattern entry; an empty tag means [`PatternSlot::Empty`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        ItemType::parse(tag).map_or(Self::Empty, Self::Required)
    }

    /// Returns the required item type, if any.
    #[must_use]
    pub fn required(&self) -> Option<&ItemType> {
        match self {
            Self::Empty => None,
            Self::Required(item) => Some(item),
        }
    }

    /// Checks whether a slot occupant satisfies this entry.
    #[must_use]
    pub fn accepts(&self, occupant: Option<&ItemType>) -> bool {
        match (self, occupant) {
            (Self::Empty, None) => true,
            (Self::Required(expected), Some(actual)) => expected == actual,
            (Self::Empty, Some(_)) | (Self::Required(_), None) => false,
        }
    }
}

impl From<Option<ItemType>> for PatternSlot {
    fn from(item: Option<ItemType>) -> Self {
        item.map_or(Self::Empty, Self::Required)
    }
}

/// First reason a snapshot fails to match a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Snapshot and pattern have different lengths.
    LengthMismatch {
        /// Pattern length.
        expected: usize,
        /// Snapshot length.
        actual: usize,
    },
    /// Pattern requires an empty slot but an item is present.
    ExpectedEmpty {
        /// Slot index.
        index: usize,
        /// Occupant found.
        found: ItemType,
    },
    /// Pattern requires a specific item.
    ExpectedItem {
        /// Slot index.
        index: usize,
        /// Required item.
        expected: ItemType,
        /// Occupant found (None = empty).
        found: Option<ItemType>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "slot count mismatch: pattern {expected}, grid {actual}")
            },
            Self::ExpectedEmpty { index, found } => {
                write!(f, "slot {index} expected empty, found '{found}'")
            },
            Self::ExpectedItem {
                index,
                expected,
                found: Some(found),
            } => write!(f, "slot {index} expected '{expected}', found '{found}'"),
            Self::ExpectedItem {
                index,
                expected,
                found: None,
            } => write!(f, "slot {index} expected '{expected}', found empty"),
        }
    }
}

// ============================================================================
// Recipe
// ============================================================================

/// A crafting recipe: a positional pattern over every grid slot plus an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier.
    pub id: RecipeId,
    /// Recipe name.
    pub name: String,
    /// One entry per grid slot, row-major.
    pub pattern: Vec<PatternSlot>,
    /// What the recipe produces.
    pub output: OutputId,
}

impl Recipe {
    /// Creates a new recipe builder.
    #[must_use]
    pub fn builder(id: RecipeId, name: impl Into<String>, output: OutputId) -> RecipeBuilder {
        RecipeBuilder::new(id, name, output)
    }

    /// Pattern length (must equal the grid's slot count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// True for a zero-length pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Number of slots that must be occupied.
    #[must_use]
    pub fn ingredient_count(&self) -> usize {
        self.pattern.iter().filter(|s| s.required().is_some()).count()
    }

    /// Required items in slot order.
    #[must_use]
    pub fn required_items(&self) -> Vec<&ItemType> {
        self.pattern.iter().filter_map(PatternSlot::required).collect()
    }

    /// Finds the first position where `snapshot` disagrees with the pattern.
    ///
    /// Returns `None` when the snapshot matches.
    #[must_use]
    pub fn mismatch(&self, snapshot: &[Option<ItemType>]) -> Option<Mismatch> {
        if snapshot.len() != self.pattern.len() {
            return Some(Mismatch::LengthMismatch {
                expected: self.pattern.len(),
                actual: snapshot.len(),
            });
        }

        for (index, (slot, occupant)) in self.pattern.iter().zip(snapshot).enumerate() {
            if slot.accepts(occupant.as_ref()) {
                continue;
            }
            return Some(match (slot, occupant) {
                (PatternSlot::Required(expected), found) => Mismatch::ExpectedItem {
                    index,
                    expected: expected.clone(),
                    found: found.clone(),
                },
                (PatternSlot::Empty, Some(found)) => Mismatch::ExpectedEmpty {
                    index,
                    found: found.clone(),
                },
                (PatternSlot::Empty, None) => continue,
            });
        }

        None
    }

    /// Checks whether `snapshot` satisfies the pattern exactly, position by position.
    #[must_use]
    pub fn matches(&self, snapshot: &[Option<ItemType>]) -> bool {
        match self.mismatch(snapshot) {
            None => true,
            Some(reason) => {
                trace!("Recipe {} ({}) rejected: {}", self.id, self.name, reason);
                false
            },
        }
    }

    /// Checks that the pattern covers exactly `slot_count` slots.
    pub fn validate_length(&self, slot_count: usize) -> ConfigResult<()> {
        if self.pattern.len() == slot_count {
            Ok(())
        } else {
            Err(ConfigError::PatternLength {
                recipe: self.id,
                expected: slot_count,
                actual: self.pattern.len(),
            })
        }
    }
}

/// Builder for creating recipes.
#[derive(Debug)]
pub struct RecipeBuilder {
    id: RecipeId,
    name: String,
    pattern: Vec<PatternSlot>,
    output: OutputId,
}

impl RecipeBuilder {
    /// Creates a new recipe builder.
    fn new(id: RecipeId, name: impl Into<String>, output: OutputId) -> Self {
        Self {
            id,
            name: name.into(),
            pattern: Vec::new(),
            output,
        }
    }

    /// Appends a slot that must hold `item`.
    #[must_use]
    pub fn item(mut self, item: impl Into<ItemType>) -> Self {
        self.pattern.push(PatternSlot::Required(item.into()));
        self
    }

    /// Appends a slot that must be empty.
    #[must_use]
    pub fn empty(mut self) -> Self {
        self.pattern.push(PatternSlot::Empty);
        self
    }

    /// Appends entries from tags; `""` means empty.
    #[must_use]
    pub fn tags<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> Self {
        self.pattern.extend(tags.into_iter().map(PatternSlot::from_tag));
        self
    }

    /// Builds the recipe.
    #[must_use]
    pub fn build(self) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name,
            pattern: self.pattern,
            output: self.output,
        }
    }
}

// ============================================================================
// Recipe book
// ============================================================================

/// Ordered collection of recipes.
///
/// Registration order is significant: when several recipes match the same
/// snapshot, the first registered one wins. Identical patterns are allowed.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    /// Recipes in registration order.
    recipes: Vec<Recipe>,
    /// Position by ID.
    by_id: AHashMap<RecipeId, usize>,
    /// Positions by output.
    by_output: AHashMap<OutputId, Vec<usize>>,
}

impl RecipeBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a book from recipes in order.
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> ConfigResult<Self> {
        let mut book = Self::new();
        for recipe in recipes {
            book.register(recipe)?;
        }
        Ok(book)
    }

    /// Appends a recipe. IDs must be unique.
    pub fn register(&mut self, recipe: Recipe) -> ConfigResult<()> {
        if self.by_id.contains_key(&recipe.id) {
            return Err(ConfigError::DuplicateRecipeId(recipe.id.raw()));
        }

        let idx = self.recipes.len();
        self.by_id.insert(recipe.id, idx);
        self.by_output
            .entry(recipe.output.clone())
            .or_default()
            .push(idx);
        debug!(
            "Registered recipe {} ({}) with {} ingredients",
            recipe.id,
            recipe.name,
            recipe.ingredient_count()
        );
        self.recipes.push(recipe);
        Ok(())
    }

    /// Checks every pattern against the grid's slot count.
    pub fn validate(&self, slot_count: usize) -> ConfigResult<()> {
        self.recipes
            .iter()
            .try_for_each(|recipe| recipe.validate_length(slot_count))
    }

    /// Returns the first recipe, in registration order, matching `snapshot`.
    #[must_use]
    pub fn find_match(&self, snapshot: &[Option<ItemType>]) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.matches(snapshot))
    }

    /// Returns every recipe matching `snapshot`, in registration order.
    #[must_use]
    pub fn find_matches(&self, snapshot: &[Option<ItemType>]) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.matches(snapshot))
            .collect()
    }

    /// Gets a recipe by ID.
    #[must_use]
    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.by_id.get(&id).map(|&idx| &self.recipes[idx])
    }

    /// Gets recipes producing `output`, in registration order.
    #[must_use]
    pub fn by_output(&self, output: &OutputId) -> Vec<&Recipe> {
        self.by_output
            .get(output)
            .map(|ids| ids.iter().map(|&idx| &self.recipes[idx]).collect())
            .unwrap_or_default()
    }

    /// Iterates recipes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True when the book holds no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
