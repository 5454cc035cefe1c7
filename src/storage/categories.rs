//! Category repository
//!
//! Holds categories in memory and hands out auto-incrementing ids.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::BudgetError;
use crate::models::{Category, CategoryId};

/// Repository for category persistence
pub struct CategoryRepository {
    categories: RwLock<BTreeMap<CategoryId, Category>>,
    next_id: RwLock<CategoryId>,
}

impl Default for CategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(CategoryId::new(1)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<CategoryId, Category>>, BudgetError> {
        self.categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<CategoryId, Category>>, BudgetError> {
        self.categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the contents with loaded records
    ///
    /// The id counter never goes backwards past an id already in use.
    pub fn replace_all(
        &self,
        loaded: Vec<Category>,
        next_id: CategoryId,
    ) -> Result<(), BudgetError> {
        let mut categories = self.write()?;
        let mut next = self
            .next_id
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        let mut floor = next_id.max(CategoryId::new(1));
        for category in loaded {
            floor = floor.max(category.id.next());
            categories.insert(category.id, category);
        }
        *next = floor;

        Ok(())
    }

    /// All categories (ordered by id) plus the next id to assign
    pub fn snapshot(&self) -> Result<(Vec<Category>, CategoryId), BudgetError> {
        let categories = self.read()?;
        let next = self
            .next_id
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok((categories.values().cloned().collect(), *next))
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, BudgetError> {
        Ok(self.read()?.values().find(|c| c.has_name(name)).cloned())
    }

    /// Get all categories, ordered by id
    pub fn get_all(&self) -> Result<Vec<Category>, BudgetError> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Create a category under the next free id
    pub fn insert_new(&self, name: &str) -> Result<Category, BudgetError> {
        let mut categories = self.write()?;
        let mut next = self
            .next_id
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let category = Category::new(*next, name.trim());
        *next = next.next();
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    /// Insert or update a category, returning the previous version
    pub fn upsert(&self, category: Category) -> Result<Option<Category>, BudgetError> {
        Ok(self.write()?.insert(category.id, category))
    }

    /// Delete a category
    pub fn delete(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        Ok(self.write()?.remove(&id))
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, BudgetError> {
        Ok(self.read()?.len())
    }
}
