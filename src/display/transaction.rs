//! Transaction display formatting
//!
//! Register rows and detail views for transactions.

use super::{category_label, truncate, CategoryNames};
use crate::models::{Transaction, TransactionKind};

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, category: &str, symbol: &str) -> String {
    let sign = match txn.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };

    format!(
        "{:12} {} {} {:>13} {}",
        txn.id.short(),
        txn.date.format("%Y-%m-%d"),
        truncate(category, 16),
        format!("{}{}", sign, txn.amount.format_with_symbol(symbol)),
        txn.description
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    names: &CategoryNames,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:16} {:>13} {}\n",
        "ID", "Date", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for txn in transactions {
        let category = category_label(names, txn.category_id);
        output.push_str(&format_transaction_row(txn, &category, symbol));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, category: &str, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Category:    {}\n", category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money};
    use chrono::NaiveDate;

    fn sample() -> Transaction {
        Transaction::new(
            TransactionKind::Expense,
            Money::from_cents(12050),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            CategoryId::new(1),
        )
        .with_description("Groceries")
    }

    #[test]
    fn test_register_row() {
        let txn = sample();
        let mut names = CategoryNames::new();
        names.insert(CategoryId::new(1), "Food".into());

        let output = format_transaction_register(&[txn.clone()], &names, "$");
        assert!(output.contains(&txn.id.short()));
        assert!(output.contains("2024-03-05"));
        assert!(output.contains("Food"));
        assert!(output.contains("-$120.50"));
        assert!(output.contains("Groceries"));
    }

    #[test]
    fn test_empty_register() {
        let output = format_transaction_register(&[], &CategoryNames::new(), "$");
        assert_eq!(output, "No transactions found.\n");
    }

    #[test]
    fn test_details() {
        let output = format_transaction_details(&sample(), "Food", "€");
        assert!(output.contains("Type:        expense"));
        assert!(output.contains("Amount:      €120.50"));
        assert!(output.contains("Description: Groceries"));
    }
}
