//! Report CLI commands
//!
//! Monthly balance, annual spending totals and the month dashboard.

use chrono::Datelike;
use clap::Subcommand;
use serde_json::json;

use super::{open_engine, parse_period, print_json};
use crate::config::settings::Settings;
use crate::display::format_monthly_balance;
use crate::error::BudgetResult;
use crate::reports::{AnnualReport, DashboardReport};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Estimated and actual income, expenses and balance for a month
    Balance {
        /// Budget period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Spending per category over a year
    Annual {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Month at a glance
    Dashboard {
        /// Budget period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },
}

/// Handle a report command
pub async fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
    json: bool,
) -> BudgetResult<()> {
    let engine = open_engine(storage, settings).await?;
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Balance { period } => {
            let period = parse_period(period.as_deref())?;
            let balance = engine.monthly_balance(period.year, period.month);

            if json {
                print_json(&json!({
                    "income_estimated": balance.income_estimated.to_decimal_string(),
                    "income_actual": balance.income_actual.to_decimal_string(),
                    "expense_estimated": balance.expense_estimated.to_decimal_string(),
                    "expense_actual": balance.expense_actual.to_decimal_string(),
                    "balance_estimated": balance.balance_estimated.to_decimal_string(),
                    "balance_real": balance.balance_real.to_decimal_string(),
                }))?;
            } else {
                print!("{}", format_monthly_balance(period, &balance, symbol));
            }
        }

        ReportCommands::Annual { year } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let report = AnnualReport::generate(storage, &engine, year).await?;

            if json {
                let totals: serde_json::Map<_, _> = report
                    .categories
                    .iter()
                    .map(|c| (c.name.clone(), json!(c.total.to_decimal_string())))
                    .collect();
                print_json(&json!({
                    "year": report.year,
                    "categories": totals,
                    "total": report.total.to_decimal_string(),
                }))?;
            } else {
                print!("{}", report.format_terminal(symbol));
            }
        }

        ReportCommands::Dashboard { period } => {
            let period = parse_period(period.as_deref())?;
            let report = DashboardReport::generate(storage, &engine, period).await?;

            if json {
                print_json(&report)?;
            } else {
                print!("{}", report.format_terminal(symbol));
            }
        }
    }

    Ok(())
}
