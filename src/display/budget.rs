//! Budget query display formatting
//!
//! Tables for expense budgets, comparisons, deviations, critical categories,
//! income comparisons and monthly balances.

use std::collections::BTreeMap;

use super::{category_label, truncate, CategoryNames};
use crate::models::{CategoryAmounts, CategoryId, Money, YearMonth};
use crate::services::{CriticalCategory, Deviation, IncomeComparison, MonthlyBalance};

/// Estimated spend per category for a month
pub fn format_expense_budget(
    period: YearMonth,
    budget: &CategoryAmounts,
    names: &CategoryNames,
    symbol: &str,
) -> String {
    let mut output = format!("Expense budget for {}\n", period.friendly());

    if budget.is_empty() {
        output.push_str("No budget set for this month.\n");
        return output;
    }

    output.push_str(&"-".repeat(40));
    output.push('\n');
    for (category, amount) in budget {
        output.push_str(&format!(
            "{} {:>13}\n",
            truncate(&category_label(names, *category), 24),
            amount.format_with_symbol(symbol)
        ));
    }
    let total: Money = budget.values().sum();
    output.push_str(&"-".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "{} {:>13}\n",
        truncate("Total", 24),
        total.format_with_symbol(symbol)
    ));

    output
}

/// Remaining budget (estimated minus actual) per category
pub fn format_budget_comparison(
    period: YearMonth,
    comparison: &BTreeMap<CategoryId, Money>,
    names: &CategoryNames,
    symbol: &str,
) -> String {
    let mut output = format!("Budget vs actual for {}\n", period.friendly());

    if comparison.is_empty() {
        output.push_str("No budget set for this month.\n");
        return output;
    }

    output.push_str(&format!("{} {:>13}\n", truncate("Category", 24), "Remaining"));
    output.push_str(&"-".repeat(40));
    output.push('\n');
    for (category, delta) in comparison {
        output.push_str(&format!(
            "{} {:>13}\n",
            truncate(&category_label(names, *category), 24),
            delta.format_with_symbol(symbol)
        ));
    }

    output
}

/// Estimated, actual and deviation per category, marking overspends
pub fn format_deviations(
    period: YearMonth,
    deviations: &BTreeMap<CategoryId, Deviation>,
    names: &CategoryNames,
    symbol: &str,
) -> String {
    let mut output = format!("Deviations for {}\n", period.friendly());

    if deviations.is_empty() {
        output.push_str("No budget set for this month.\n");
        return output;
    }

    output.push_str(&format!(
        "{} {:>12} {:>12} {:>12}\n",
        truncate("Category", 20),
        "Estimated",
        "Actual",
        "Deviation"
    ));
    output.push_str(&"-".repeat(62));
    output.push('\n');
    for (category, deviation) in deviations {
        let flag = if deviation.flagged { "  OVER" } else { "" };
        output.push_str(&format!(
            "{} {:>12} {:>12} {:>12}{}\n",
            truncate(&category_label(names, *category), 20),
            deviation.estimated.format_with_symbol(symbol),
            deviation.actual.format_with_symbol(symbol),
            deviation.deviation.format_with_symbol(symbol),
            flag
        ));
    }

    output
}

/// Categories ranked by how many months they went over budget
pub fn format_critical_categories(critical: &[CriticalCategory], names: &CategoryNames) -> String {
    if critical.is_empty() {
        return "No category has gone over budget.\n".to_string();
    }

    let mut output = String::from("Categories over budget (months)\n");
    output.push_str(&"-".repeat(32));
    output.push('\n');
    for entry in critical {
        output.push_str(&format!(
            "{} {:>7}\n",
            truncate(&category_label(names, entry.category_id), 24),
            entry.flag_count
        ));
    }

    output
}

pub fn format_income_comparison(
    period: YearMonth,
    comparison: &IncomeComparison,
    symbol: &str,
) -> String {
    format!(
        "Income for {}\n  Estimated: {:>13}\n  Actual:    {:>13}\n  Delta:     {:>13}\n",
        period.friendly(),
        comparison.estimated.format_with_symbol(symbol),
        comparison.actual.format_with_symbol(symbol),
        comparison.delta.format_with_symbol(symbol)
    )
}

pub fn format_monthly_balance(period: YearMonth, balance: &MonthlyBalance, symbol: &str) -> String {
    let mut output = format!("Balance for {}\n", period.friendly());
    output.push_str(&format!("{:10} {:>13} {:>13}\n", "", "Estimated", "Actual"));
    output.push_str(&format!(
        "{:10} {:>13} {:>13}\n",
        "Income",
        balance.income_estimated.format_with_symbol(symbol),
        balance.income_actual.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "{:10} {:>13} {:>13}\n",
        "Expenses",
        balance.expense_estimated.format_with_symbol(symbol),
        balance.expense_actual.format_with_symbol(symbol)
    ));
    output.push_str(&"-".repeat(38));
    output.push('\n');
    output.push_str(&format!(
        "{:10} {:>13} {:>13}\n",
        "Balance",
        balance.balance_estimated.format_with_symbol(symbol),
        balance.balance_real.format_with_symbol(symbol)
    ));
    output
}

/// One-line projection for a calendar month; `value` is a two-decimal string
pub fn format_projection(label: &str, month: u32, value: &str, symbol: &str) -> String {
    let month_name = chrono::Month::try_from(month as u8)
        .map(|m| m.name().to_string())
        .unwrap_or_else(|_| month.to_string());
    format!("Projected {} for {}: {}{}\n", label, month_name, symbol, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> CategoryNames {
        let mut names = CategoryNames::new();
        names.insert(CategoryId::new(1), "Food".into());
        names
    }

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    #[test]
    fn test_format_deviations_marks_overspend() {
        let mut deviations = BTreeMap::new();
        deviations.insert(
            CategoryId::new(1),
            Deviation {
                estimated: Money::from_units(300),
                actual: Money::from_units(320),
                deviation: Money::from_units(20),
                flagged: true,
            },
        );

        let output = format_deviations(march(), &deviations, &names(), "$");
        assert!(output.contains("March 2024"));
        assert!(output.contains("Food"));
        assert!(output.contains("$20.00  OVER"));
    }

    #[test]
    fn test_format_comparison() {
        let mut comparison = BTreeMap::new();
        comparison.insert(CategoryId::new(1), Money::from_units(180));

        let output = format_budget_comparison(march(), &comparison, &names(), "$");
        assert!(output.contains("$180.00"));

        let empty = format_budget_comparison(march(), &BTreeMap::new(), &names(), "$");
        assert!(empty.contains("No budget set"));
    }

    #[test]
    fn test_format_expense_budget_total() {
        let mut budget = CategoryAmounts::new();
        budget.insert(CategoryId::new(1), Money::from_units(300));
        budget.insert(CategoryId::new(2), Money::from_units(50));

        let output = format_expense_budget(march(), &budget, &names(), "$");
        assert!(output.contains("cat-2"));
        assert!(output.contains("$350.00"));
    }

    #[test]
    fn test_format_critical() {
        let critical = vec![CriticalCategory {
            category_id: CategoryId::new(1),
            flag_count: 4,
        }];
        let output = format_critical_categories(&critical, &names());
        assert!(output.contains("Food"));
        assert!(output.contains('4'));
        assert!(format_critical_categories(&[], &names()).contains("No category"));
    }

    #[test]
    fn test_format_balance() {
        let balance = MonthlyBalance {
            income_estimated: Money::from_units(2000),
            income_actual: Money::from_units(1800),
            expense_estimated: Money::from_units(300),
            expense_actual: Money::from_units(450),
            balance_estimated: Money::from_units(1700),
            balance_real: Money::from_units(1350),
        };
        let output = format_monthly_balance(march(), &balance, "$");
        assert!(output.contains("$1700.00"));
        assert!(output.contains("$1350.00"));
    }

    #[test]
    fn test_format_projection() {
        assert_eq!(
            format_projection("expenses", 1, "150.00", "$"),
            "Projected expenses for January: $150.00\n"
        );
    }

    #[test]
    fn test_format_income_comparison() {
        let comparison = IncomeComparison {
            estimated: Money::from_units(100),
            actual: Money::from_units(150),
            delta: Money::from_units(-50),
        };
        let output = format_income_comparison(march(), &comparison, "$");
        assert!(output.contains("-$50.00"));
    }
}
