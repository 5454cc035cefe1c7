//! Income estimate repository
//!
//! One estimate per `month-year` key.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{IncomeBudget, IncomeBudgetKey};

/// Repository for income estimates
pub struct IncomeRepository {
    estimates: RwLock<HashMap<IncomeBudgetKey, IncomeBudget>>,
}

impl Default for IncomeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl IncomeRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            estimates: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the contents with loaded records
    pub fn replace_all(&self, loaded: Vec<IncomeBudget>) -> Result<(), BudgetError> {
        let mut estimates = self
            .estimates
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        estimates.clear();
        for estimate in loaded {
            estimates.insert(estimate.key(), estimate);
        }

        Ok(())
    }

    /// Get the estimate for a month
    pub fn get(&self, key: &IncomeBudgetKey) -> Result<Option<IncomeBudget>, BudgetError> {
        let estimates = self
            .estimates
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(estimates.get(key).cloned())
    }

    /// Insert or overwrite an estimate, returning the previous one
    pub fn upsert(&self, estimate: IncomeBudget) -> Result<Option<IncomeBudget>, BudgetError> {
        let mut estimates = self
            .estimates
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(estimates.insert(estimate.key(), estimate))
    }

    /// Get all estimates ordered by year then month
    pub fn get_all(&self) -> Result<Vec<IncomeBudget>, BudgetError> {
        let estimates = self
            .estimates
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = estimates.values().cloned().collect();
        list.sort_by_key(|e| (e.year, e.month));
        Ok(list)
    }
}
