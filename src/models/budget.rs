//! Expense budgets and income estimates
//!
//! An expense budget is the estimated spend for one category in one month;
//! an income budget is the estimated income for one month. Both are keyed
//! by a compound key so that saving again overwrites the previous amount.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::money::Money;
use super::period::YearMonth;

/// Compound key `category-month-year` for expense budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseBudgetKey {
    pub category_id: CategoryId,
    pub month: u32,
    pub year: i32,
}

impl fmt::Display for ExpenseBudgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.category_id.value(), self.month, self.year)
    }
}

/// Compound key `month-year` for income budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IncomeBudgetKey {
    pub month: u32,
    pub year: i32,
}

impl fmt::Display for IncomeBudgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.month, self.year)
    }
}

/// Estimated spend for a category in a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBudget {
    pub category_id: CategoryId,
    pub month: u32,
    pub year: i32,
    pub amount: Money,
}

impl ExpenseBudget {
    pub fn new(year: i32, month: u32, category_id: CategoryId, amount: Money) -> Self {
        Self {
            category_id,
            month,
            year,
            amount,
        }
    }

    pub fn key(&self) -> ExpenseBudgetKey {
        ExpenseBudgetKey {
            category_id: self.category_id,
            month: self.month,
            year: self.year,
        }
    }

    /// Validate the month and amount
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_entry(self.year, self.month, self.amount)
    }
}

/// Estimated income for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeBudget {
    pub month: u32,
    pub year: i32,
    pub amount: Money,
}

impl IncomeBudget {
    pub fn new(year: i32, month: u32, amount: Money) -> Self {
        Self {
            month,
            year,
            amount,
        }
    }

    pub fn key(&self) -> IncomeBudgetKey {
        IncomeBudgetKey {
            month: self.month,
            year: self.year,
        }
    }

    /// Validate the month and amount
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_entry(self.year, self.month, self.amount)
    }
}

fn validate_entry(year: i32, month: u32, amount: Money) -> Result<(), BudgetValidationError> {
    YearMonth::new(year, month).map_err(|_| BudgetValidationError::InvalidMonth(month))?;
    if amount.is_negative() {
        return Err(BudgetValidationError::NegativeAmount);
    }
    Ok(())
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    InvalidMonth(u32),
    NegativeAmount,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMonth(m) => write!(f, "Invalid month: {} (expected 1-12)", m),
            Self::NegativeAmount => write!(f, "Budget amount cannot be negative"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
