//! Budget CLI commands
//!
//! Implements CLI commands for expense budgets: setting estimates, comparing
//! them with actual spending, deviations, critical categories and projections.

use clap::Subcommand;
use serde_json::json;

use super::{by_name, open_engine, parse_amount, parse_month, parse_period, print_json};
use crate::config::settings::Settings;
use crate::display::{
    category_label, format_budget_comparison, format_critical_categories, format_deviations,
    format_expense_budget, format_projection,
};
use crate::error::BudgetResult;
use crate::models::Money;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the estimated spend for a category in a month
    Set {
        /// Category name or ID
        category: String,
        /// Amount (e.g., "300" or "300.00")
        amount: String,
        /// Budget period (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show the expense budget for a month
    Show {
        /// Budget period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Remaining budget per category (estimated minus actual)
    Compare {
        /// Budget period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Estimated, actual and deviation per category
    Deviations {
        /// Budget period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Categories ranked by how many months they went over budget
    Critical,

    /// Average estimated spend for a calendar month across years
    Project {
        /// Month number or name (e.g., "3" or "March")
        month: String,
    },
}

/// Handle a budget command
pub async fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
    json: bool,
) -> BudgetResult<()> {
    let mut engine = open_engine(storage, settings).await?;
    let categories = CategoryService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            period,
        } => {
            let period = parse_period(period.as_deref())?;
            let cat = categories.require_category(&category).await?;
            let amount = parse_amount(&amount)?;

            engine
                .set_expense_budget(period.year, period.month, cat.id, amount)
                .await?;
            println!(
                "Budgeted {} for '{}' in {}",
                amount.format_with_symbol(symbol),
                cat.name,
                period.friendly()
            );
        }

        BudgetCommands::Show { period } => {
            let period = parse_period(period.as_deref())?;
            let budget = engine.expense_budget(period.year, period.month);
            let names = categories.name_lookup().await?;

            if json {
                print_json(&by_name(&budget, &names, Money::to_decimal_string))?;
            } else {
                print!("{}", format_expense_budget(period, &budget, &names, symbol));
            }
        }

        BudgetCommands::Compare { period } => {
            let period = parse_period(period.as_deref())?;
            let comparison = engine.compare_expense_budget(period.year, period.month);
            let names = categories.name_lookup().await?;

            if json {
                print_json(&by_name(&comparison, &names, Money::to_decimal_string))?;
            } else {
                print!(
                    "{}",
                    format_budget_comparison(period, &comparison, &names, symbol)
                );
            }
        }

        BudgetCommands::Deviations { period } => {
            let period = parse_period(period.as_deref())?;
            let deviations = engine.compute_deviations(period.year, period.month);
            let names = categories.name_lookup().await?;

            if json {
                print_json(&by_name(&deviations, &names, |d| {
                    json!({
                        "estimated": d.estimated.to_decimal_string(),
                        "actual": d.actual.to_decimal_string(),
                        "deviation": d.deviation.to_decimal_string(),
                        "flagged": d.flagged,
                    })
                }))?;
            } else {
                print!("{}", format_deviations(period, &deviations, &names, symbol));
            }
        }

        BudgetCommands::Critical => {
            let critical = engine.detect_critical_categories();
            let names = categories.name_lookup().await?;

            if json {
                let rows: Vec<_> = critical
                    .iter()
                    .map(|c| {
                        json!({
                            "category": category_label(&names, c.category_id),
                            "flag_count": c.flag_count,
                        })
                    })
                    .collect();
                print_json(&rows)?;
            } else {
                print!("{}", format_critical_categories(&critical, &names));
            }
        }

        BudgetCommands::Project { month } => {
            let month = parse_month(&month)?;
            let projection = engine.project_monthly_expenses(month);

            if json {
                print_json(&json!({ "month": month, "projection": projection }))?;
            } else {
                print!(
                    "{}",
                    format_projection("expenses", month, &projection, symbol)
                );
            }
        }
    }

    Ok(())
}
