//! Dashboard Report
//!
//! Month-at-a-glance summary: spend against limit per category, income and
//! expense totals, budget remaining, and the latest transactions.

use serde::Serialize;

use crate::display::truncate;
use crate::error::BudgetResult;
use crate::models::{CategoryId, Money, Transaction, TransactionKind, YearMonth};
use crate::services::{BudgetEngine, TransactionService};
use crate::storage::RecordStore;

/// Number of transactions shown in the recent list
pub const RECENT_TRANSACTIONS: usize = 6;

/// Spend for one category in the month
#[derive(Debug, Clone, Serialize)]
pub struct CategorySpend {
    pub category_id: CategoryId,
    pub name: String,
    pub spent: Money,
    /// The expense budget for the month, if one was set
    pub limit: Option<Money>,
}

impl CategorySpend {
    pub fn is_over_limit(&self) -> bool {
        self.limit.is_some_and(|limit| self.spent > limit)
    }
}

/// A transaction row with its category name resolved
#[derive(Debug, Clone, Serialize)]
pub struct RecentTransaction {
    pub transaction: Transaction,
    pub category_name: String,
}

/// Dashboard for a single month
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub period: YearMonth,
    pub categories: Vec<CategorySpend>,
    pub total_income: Money,
    pub total_expenses: Money,
    /// `total_income - total_expenses`
    pub balance: Money,
    pub total_budgeted: Money,
    /// Budgeted minus spent, never below zero
    pub budget_remaining: Money,
    pub recent: Vec<RecentTransaction>,
}

impl DashboardReport {
    /// Build the dashboard from the store and an initialized engine
    pub async fn generate<S: RecordStore>(
        store: &S,
        engine: &BudgetEngine<'_, S>,
        period: YearMonth,
    ) -> BudgetResult<Self> {
        let mut categories = store.get_all_categories().await?;
        categories.sort_by_key(|c| c.name.to_lowercase());

        let transactions = store.get_all_transactions().await?;
        let in_month: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| period.contains(t.date))
            .collect();

        let total_income: Money = in_month
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount)
            .sum();
        let total_expenses: Money = in_month
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| t.amount)
            .sum();

        let limits = engine.expense_budget(period.year, period.month);
        let total_budgeted: Money = limits.values().sum();

        let rows = categories
            .iter()
            .map(|category| CategorySpend {
                category_id: category.id,
                name: category.name.clone(),
                spent: in_month
                    .iter()
                    .filter(|t| t.is_expense() && t.category_id == category.id)
                    .map(|t| t.amount)
                    .sum(),
                limit: limits.get(&category.id).copied(),
            })
            .collect();

        let recent = TransactionService::new(store)
            .recent(RECENT_TRANSACTIONS)
            .await?
            .into_iter()
            .map(|t| RecentTransaction {
                category_name: categories
                    .iter()
                    .find(|c| c.id == t.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| t.category_id.to_string()),
                transaction: t,
            })
            .collect();

        Ok(Self {
            period,
            categories: rows,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            total_budgeted,
            budget_remaining: (total_budgeted - total_expenses).max(Money::zero()),
            recent,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Dashboard: {}\n", self.period.friendly()));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Income:   {:>14}\n",
            self.total_income.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Expenses: {:>14}\n",
            self.total_expenses.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Balance:  {:>14}\n\n",
            self.balance.format_with_symbol(symbol)
        ));

        output.push_str(&format!(
            "Budgeted: {}   Remaining: {}\n\n",
            self.total_budgeted.format_with_symbol(symbol),
            self.budget_remaining.format_with_symbol(symbol)
        ));

        output.push_str(&format!("{:<24} {:>12} {:>12}\n", "Category", "Spent", "Limit"));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for row in &self.categories {
            let limit = row
                .limit
                .map(|l| l.format_with_symbol(symbol))
                .unwrap_or_else(|| "-".to_string());
            let marker = if row.is_over_limit() { " !" } else { "" };
            output.push_str(&format!(
                "{:<24} {:>12} {:>12}{}\n",
                truncate(&row.name, 24),
                row.spent.format_with_symbol(symbol),
                limit,
                marker
            ));
        }

        output.push_str("\nRecent transactions:\n");
        if self.recent.is_empty() {
            output.push_str("  (none)\n");
        }
        for entry in &self.recent {
            let txn = &entry.transaction;
            output.push_str(&format!(
                "  {} {:<8} {:>12} {:<16} {}\n",
                txn.date.format("%Y-%m-%d"),
                txn.kind.to_string(),
                txn.amount.format_with_symbol(symbol),
                truncate(&entry.category_name, 16),
                txn.description
            ));
        }

        output
    }
}
