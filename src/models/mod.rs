//! Core data models for budgetwise
//!
//! This module contains the data structures of the finance domain:
//! categories, transactions, expense budgets, income estimates, and the
//! nested aggregate tables derived from them.

pub mod aggregate;
pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use aggregate::{CategoryAmounts, ExpenseTable, IncomeTable, YearMonthTable};
pub use budget::{ExpenseBudget, ExpenseBudgetKey, IncomeBudget, IncomeBudgetKey};
pub use category::{Category, DEFAULT_CATEGORIES};
pub use ids::{CategoryId, TransactionId};
pub use money::Money;
pub use period::YearMonth;
pub use transaction::{Transaction, TransactionKind};
