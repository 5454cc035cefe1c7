//! Annual Report
//!
//! Actual spending per category summed over a calendar year.

use serde::Serialize;

use crate::error::BudgetResult;
use crate::models::{CategoryId, Money};
use crate::services::{BudgetEngine, CategoryService};
use crate::storage::RecordStore;

#[derive(Debug, Clone, Serialize)]
pub struct AnnualCategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub total: Money,
}

/// Spending totals for a year, largest first
#[derive(Debug, Clone, Serialize)]
pub struct AnnualReport {
    pub year: i32,
    pub categories: Vec<AnnualCategoryTotal>,
    pub total: Money,
}

impl AnnualReport {
    pub async fn generate<S: RecordStore>(
        store: &S,
        engine: &BudgetEngine<'_, S>,
        year: i32,
    ) -> BudgetResult<Self> {
        let names = CategoryService::new(store).name_lookup().await?;

        let mut categories: Vec<_> = engine
            .annual_category_totals(year)
            .into_iter()
            .map(|(category_id, total)| AnnualCategoryTotal {
                category_id,
                name: names
                    .get(&category_id)
                    .cloned()
                    .unwrap_or_else(|| category_id.to_string()),
                total,
            })
            .collect();
        categories.sort_by(|a, b| b.total.cmp(&a.total));

        let total = categories.iter().map(|c| c.total).sum();

        Ok(Self {
            year,
            categories,
            total,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Annual Spending: {}\n", self.year));
        output.push_str(&"=".repeat(40));
        output.push('\n');

        if self.categories.is_empty() {
            output.push_str("No expenses recorded.\n");
            return output;
        }

        for row in &self.categories {
            output.push_str(&format!(
                "{:<26} {:>13}\n",
                row.name,
                row.total.format_with_symbol(symbol)
            ));
        }
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>13}\n",
            "TOTAL",
            self.total.format_with_symbol(symbol)
        ));

        output
    }
}
