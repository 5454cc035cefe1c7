//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing, editing and deleting
//! income and expense transactions.

use chrono::Local;
use clap::Subcommand;

use super::{parse_amount, parse_date, print_json};
use crate::config::settings::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{BudgetError, BudgetResult};
use crate::models::transaction::TransactionValidationError;
use crate::models::{CategoryId, TransactionKind};
use crate::services::{
    CategoryService, NewTransaction, TransactionFilter, TransactionService, TransactionUpdate,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// "income" or "expense"
        kind: String,
        /// Amount (e.g., "120" or "120.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Only "income" or "expense"
        #[arg(long)]
        kind: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Text to look for in the description or category name
        #[arg(short, long)]
        search: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID or unique prefix
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID or unique prefix
        id: String,
        /// New kind
        #[arg(long)]
        kind: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID or unique prefix
        id: String,
    },
}

fn parse_kind(kind: &str) -> BudgetResult<TransactionKind> {
    kind.parse()
        .map_err(|e: TransactionValidationError| BudgetError::Validation(e.to_string()))
}

async fn resolve_category(storage: &Storage, identifier: &str) -> BudgetResult<CategoryId> {
    Ok(CategoryService::new(storage)
        .require_category(identifier)
        .await?
        .id)
}

/// Handle a transaction command
pub async fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
    json: bool,
) -> BudgetResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let input = NewTransaction {
                kind: parse_kind(&kind)?,
                amount: parse_amount(&amount)?,
                date: match date {
                    Some(d) => parse_date(&d)?,
                    None => Local::now().date_naive(),
                },
                category_id: resolve_category(storage, &category).await?,
                description: description.unwrap_or_default(),
            };

            let txn = service.record(input).await?;
            println!(
                "Recorded {} of {} on {}",
                txn.kind,
                txn.amount.format_with_symbol(symbol),
                txn.date.format("%Y-%m-%d")
            );
            println!("  ID: {}", txn.id.short());
        }

        TransactionCommands::List {
            kind,
            category,
            from,
            to,
            search,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            if let Some(category) = category {
                filter = filter.category(resolve_category(storage, &category).await?);
            }
            if let Some(from) = from {
                filter.start_date = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(parse_date(&to)?);
            }
            if let Some(search) = search {
                filter = filter.text(search);
            }

            let transactions = service.list(&filter).await?;
            if json {
                print_json(&transactions)?;
            } else {
                let names = CategoryService::new(storage).name_lookup().await?;
                print!(
                    "{}",
                    format_transaction_register(&transactions, &names, symbol)
                );
            }
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)
                .await?
                .ok_or_else(|| BudgetError::transaction_not_found(&id))?;

            if json {
                print_json(&txn)?;
            } else {
                let category = CategoryService::new(storage)
                    .get_category(txn.category_id)
                    .await?
                    .map(|c| c.name)
                    .unwrap_or_else(|| txn.category_id.to_string());
                print!("{}", format_transaction_details(&txn, &category, symbol));
            }
        }

        TransactionCommands::Edit {
            id,
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let txn = service
                .find(&id)
                .await?
                .ok_or_else(|| BudgetError::transaction_not_found(&id))?;

            let changes = TransactionUpdate {
                kind: kind.as_deref().map(parse_kind).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                category_id: match category {
                    Some(c) => Some(resolve_category(storage, &c).await?),
                    None => None,
                },
                description,
            };

            if changes.kind.is_none()
                && changes.amount.is_none()
                && changes.date.is_none()
                && changes.category_id.is_none()
                && changes.description.is_none()
            {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(txn.id, changes).await?;
            println!("Updated transaction {}", updated.id.short());
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&id)
                .await?
                .ok_or_else(|| BudgetError::transaction_not_found(&id))?;

            service.delete(txn.id).await?;
            println!("Deleted transaction {}", txn.id.short());
        }
    }

    Ok(())
}
