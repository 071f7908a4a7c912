//! Category catalog for lookup by id or name.
//!
//! The catalog holds the categories players may declare during a session.
//! It is purely in-memory; persisting it is up to the surrounding layer.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::category::{Category, CategoryId};
use crate::core::{GameError, GameResult};

/// Catalog of categories with sequential ids starting at 1.
///
/// ## Example
///
/// ```
/// use floor_duel::categories::CategoryCatalog;
///
/// let mut catalog = CategoryCatalog::new();
/// let history = catalog.add("History").unwrap();
///
/// assert_eq!(catalog.get(history).unwrap().name(), "History");
/// assert!(catalog.add("   ").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct CategoryCatalog {
    categories: FxHashMap<CategoryId, Arc<Category>>,
    next_id: u32,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            categories: FxHashMap::default(),
            next_id: 1,
        }
    }
}

impl CategoryCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category by name. Surrounding whitespace is trimmed.
    pub fn add(&mut self, name: &str) -> GameResult<CategoryId> {
        self.insert(name, None)
    }

    /// Add a category with a description.
    ///
    /// A blank description is stored as none.
    pub fn add_with_description(&mut self, name: &str, description: &str) -> GameResult<CategoryId> {
        self.insert(name, Some(description))
    }

    fn insert(&mut self, name: &str, description: Option<&str>) -> GameResult<CategoryId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyCategoryName);
        }

        let category = match description.map(str::trim).filter(|d| !d.is_empty()) {
            Some(desc) => Category::with_description(name, desc),
            None => Category::new(name),
        };

        let id = CategoryId::new(self.next_id);
        self.next_id += 1;
        self.categories.insert(id, Arc::new(category));
        Ok(id)
    }

    /// Add every non-blank entry of a comma-separated list.
    ///
    /// Returns the ids in list order.
    pub fn extend_from_csv(&mut self, list: &str) -> Vec<CategoryId> {
        list.split(',')
            .filter_map(|name| self.add(name).ok())
            .collect()
    }

    /// Get a category by ID.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&Arc<Category>> {
        self.categories.get(&id)
    }

    /// Find the first category (lowest id) with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<(CategoryId, &Arc<Category>)> {
        self.categories
            .iter()
            .filter(|(_, c)| c.name() == name)
            .min_by_key(|(id, _)| **id)
            .map(|(id, c)| (*id, c))
    }

    /// Check if a category ID is registered.
    #[must_use]
    pub fn contains(&self, id: CategoryId) -> bool {
        self.categories.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate over categories in id order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &Arc<Category>)> {
        let mut entries: Vec<_> = self.categories.iter().map(|(id, c)| (*id, c)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter()
    }
}
