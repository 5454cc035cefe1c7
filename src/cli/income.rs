//! Income CLI commands

use clap::Subcommand;
use serde_json::json;

use super::{open_engine, parse_amount, parse_month, parse_period, print_json};
use crate::config::settings::Settings;
use crate::display::{format_income_comparison, format_projection};
use crate::error::BudgetResult;
use crate::storage::Storage;

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Set the estimated income for a month
    Set {
        /// Amount (e.g., "2000")
        amount: String,
        /// Budget period (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Estimated vs actual income for a month
    Compare {
        /// Budget period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Average estimated income for a calendar month across years
    Project {
        /// Month number or name (e.g., "3" or "March")
        month: String,
    },
}

/// Handle an income command
pub async fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
    json: bool,
) -> BudgetResult<()> {
    let mut engine = open_engine(storage, settings).await?;
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        IncomeCommands::Set { amount, period } => {
            let period = parse_period(period.as_deref())?;
            let amount = parse_amount(&amount)?;

            engine
                .set_income_estimate(period.year, period.month, amount)
                .await?;
            println!(
                "Estimated income of {} for {}",
                amount.format_with_symbol(symbol),
                period.friendly()
            );
        }

        IncomeCommands::Compare { period } => {
            let period = parse_period(period.as_deref())?;
            let comparison = engine.compare_income(period.year, period.month);

            if json {
                print_json(&json!({
                    "estimated": comparison.estimated.to_decimal_string(),
                    "actual": comparison.actual.to_decimal_string(),
                    "delta": comparison.delta.to_decimal_string(),
                }))?;
            } else {
                print!("{}", format_income_comparison(period, &comparison, symbol));
            }
        }

        IncomeCommands::Project { month } => {
            let month = parse_month(&month)?;
            let projection = engine.project_monthly_income(month);

            if json {
                print_json(&json!({ "month": month, "projection": projection }))?;
            } else {
                print!("{}", format_projection("income", month, &projection, symbol));
            }
        }
    }

    Ok(())
}
