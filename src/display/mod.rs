//! Display formatting for terminal output
//!
//! Plain-text tables for categories, transactions and the budget queries.

pub mod budget;
pub mod category;
pub mod transaction;

use std::collections::BTreeMap;

use crate::models::CategoryId;

pub use budget::{
    format_budget_comparison, format_critical_categories, format_deviations,
    format_expense_budget, format_income_comparison, format_monthly_balance, format_projection,
};
pub use category::format_category_list;
pub use transaction::{format_transaction_details, format_transaction_register};

/// Id to name table used to label rows
pub type CategoryNames = BTreeMap<CategoryId, String>;

/// Category name, falling back to the id for categories that no longer exist
pub(crate) fn category_label(names: &CategoryNames, id: CategoryId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

/// Pad or cut a string to exactly `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
