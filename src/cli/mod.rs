//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod budget;
pub mod category;
pub mod income;
pub mod report;
pub mod transaction;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::settings::Settings;
use crate::display::{category_label, CategoryNames};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{period::validate_month, CategoryId, Money, YearMonth};
use crate::services::BudgetEngine;
use crate::storage::Storage;

pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// Parse a `YYYY-MM` period, defaulting to the current month
pub fn parse_period(period: Option<&str>) -> BudgetResult<YearMonth> {
    match period.map(str::trim) {
        None | Some("current") => Ok(YearMonth::current()),
        Some(s) => YearMonth::parse(s).map_err(|e| BudgetError::Validation(e.to_string())),
    }
}

/// Parse a month given as a number (`3`) or a name (`March`, `mar`)
pub fn parse_month(month: &str) -> BudgetResult<u32> {
    let month = month.trim();
    if let Ok(number) = month.parse::<u32>() {
        return validate_month(number).map_err(|e| BudgetError::Validation(e.to_string()));
    }

    month
        .parse::<chrono::Month>()
        .map(|m| m.number_from_month())
        .map_err(|_| BudgetError::Validation(format!("Invalid month: {}", month)))
}

pub fn parse_amount(amount: &str) -> BudgetResult<Money> {
    Money::parse(amount).map_err(|e| BudgetError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", date))
    })
}

/// Build an engine with the configured projection policy and load it
pub async fn open_engine<'a>(
    storage: &'a Storage,
    settings: &Settings,
) -> BudgetResult<BudgetEngine<'a, Storage>> {
    let mut engine = BudgetEngine::new(storage).with_policy(settings.projection_policy);
    engine.initialize().await?;
    Ok(engine)
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> BudgetResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Re-key a per-category map by category name for JSON output
pub(crate) fn by_name<V, W>(
    values: &BTreeMap<CategoryId, V>,
    names: &CategoryNames,
    convert: impl Fn(&V) -> W,
) -> BTreeMap<String, W> {
    values
        .iter()
        .map(|(id, value)| (category_label(names, *id), convert(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("3").unwrap(), 3);
        assert_eq!(parse_month("March").unwrap(), 3);
        assert_eq!(parse_month("dec").unwrap(), 12);
        assert!(parse_month("13").unwrap_err().is_validation());
        assert!(parse_month("Smarch").is_err());
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(
            parse_period(Some("2024-03")).unwrap(),
            YearMonth::new(2024, 3).unwrap()
        );
        assert_eq!(parse_period(None).unwrap(), YearMonth::current());
        assert!(parse_period(Some("2024-13")).is_err());
        assert!(parse_period(Some("March")).is_err());
    }

    #[test]
    fn test_parse_amount_and_date() {
        assert_eq!(parse_amount("1,250.50").unwrap(), Money::from_cents(125050));
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("100000000000000000")
            .unwrap_err()
            .is_validation());
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert!(parse_date("05/03/2024").is_err());
    }

    #[test]
    fn test_by_name_falls_back_to_id() {
        let mut names = CategoryNames::new();
        names.insert(CategoryId::new(1), "Food".into());
        let mut values = BTreeMap::new();
        values.insert(CategoryId::new(1), Money::from_units(180));
        values.insert(CategoryId::new(9), Money::from_units(5));

        let keyed = by_name(&values, &names, Money::to_decimal_string);
        assert_eq!(keyed["Food"], "180.00");
        assert_eq!(keyed["cat-9"], "5.00");
    }
}
