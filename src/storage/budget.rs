//! Expense budget repository
//!
//! One entry per `category-month-year` key; saving again overwrites.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{CategoryId, ExpenseBudget, ExpenseBudgetKey};

/// Repository for expense budget persistence
pub struct BudgetRepository {
    budgets: RwLock<HashMap<ExpenseBudgetKey, ExpenseBudget>>,
}

impl Default for BudgetRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the contents with loaded records
    ///
    /// Later duplicates of a key win, matching upsert semantics.
    pub fn replace_all(&self, loaded: Vec<ExpenseBudget>) -> Result<(), BudgetError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.clear();
        for budget in loaded {
            budgets.insert(budget.key(), budget);
        }

        Ok(())
    }

    /// Get the budget for a key
    pub fn get(&self, key: &ExpenseBudgetKey) -> Result<Option<ExpenseBudget>, BudgetError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets.get(key).cloned())
    }

    /// Get all budgets ordered by year, month, then category
    pub fn get_all(&self) -> Result<Vec<ExpenseBudget>, BudgetError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by_key(|b| (b.year, b.month, b.category_id));
        Ok(list)
    }

    /// Insert or overwrite a budget, returning the previous entry for the key
    pub fn upsert(&self, budget: ExpenseBudget) -> Result<Option<ExpenseBudget>, BudgetError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(budgets.insert(budget.key(), budget))
    }

    /// Delete all budgets for a category
    pub fn delete_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ExpenseBudget>, BudgetError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let keys: Vec<_> = budgets
            .keys()
            .filter(|k| k.category_id == category_id)
            .copied()
            .collect();
        Ok(keys.iter().filter_map(|k| budgets.remove(k)).collect())
    }

    /// Count budgets
    pub fn count(&self) -> Result<usize, BudgetError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(budgets.len())
    }
}
