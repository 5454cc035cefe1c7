//! Service layer for budgetwise
//!
//! Business logic on top of the record store: category and transaction
//! management, and the budget aggregation engine.

pub mod budget;
pub mod category;
pub mod transaction;

pub use budget::{BudgetEngine, CriticalCategory, Deviation, IncomeComparison, MonthlyBalance};
pub use category::CategoryService;
pub use transaction::{NewTransaction, TransactionFilter, TransactionService, TransactionUpdate};
