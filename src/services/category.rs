//! Category service
//!
//! Category management on top of a record store: creation with duplicate
//! checks, lookup by name or id, renaming, and cascading deletes.

use std::collections::BTreeMap;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, CategoryId};
use crate::storage::RecordStore;

/// Service for category management
pub struct CategoryService<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> CategoryService<'a, S> {
    /// Create a new category service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new category
    pub async fn create_category(&self, name: &str) -> BudgetResult<Category> {
        let id = self.store.add_category(name).await?;
        self.get_category(id)
            .await?
            .ok_or_else(|| BudgetError::category_not_found(id.to_string()))
    }

    /// List all categories sorted by name
    pub async fn list_categories(&self) -> BudgetResult<Vec<Category>> {
        let mut categories = self.store.get_all_categories().await?;
        categories.sort_by_key(|c| c.name.to_lowercase());
        Ok(categories)
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: CategoryId) -> BudgetResult<Option<Category>> {
        Ok(self
            .store
            .get_all_categories()
            .await?
            .into_iter()
            .find(|c| c.id == id))
    }

    /// Find a category by name or ID string
    pub async fn find_category(&self, identifier: &str) -> BudgetResult<Option<Category>> {
        let categories = self.store.get_all_categories().await?;

        // Try by name first
        if let Some(category) = categories.iter().find(|c| c.has_name(identifier)) {
            return Ok(Some(category.clone()));
        }

        // Try parsing as ID
        if let Ok(id) = identifier.trim().parse::<CategoryId>() {
            return Ok(categories.into_iter().find(|c| c.id == id));
        }

        Ok(None)
    }

    /// Like [`find_category`](Self::find_category) but missing is an error
    pub async fn require_category(&self, identifier: &str) -> BudgetResult<Category> {
        self.find_category(identifier)
            .await?
            .ok_or_else(|| BudgetError::category_not_found(identifier))
    }

    /// Rename a category
    pub async fn rename_category(&self, id: CategoryId, name: &str) -> BudgetResult<Category> {
        self.store.update_category(id, name).await?;
        self.get_category(id)
            .await?
            .ok_or_else(|| BudgetError::category_not_found(id.to_string()))
    }

    /// Delete a category with its transactions and budgets
    ///
    /// Returns how many transactions were removed.
    pub async fn delete_category(&self, id: CategoryId) -> BudgetResult<usize> {
        self.store.delete_category_and_transactions(id).await
    }

    /// Map of category id to display name
    pub async fn name_lookup(&self) -> BudgetResult<BTreeMap<CategoryId, String>> {
        Ok(self
            .store
            .get_all_categories()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect())
    }
}
