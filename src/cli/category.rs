//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use super::print_json;
use crate::display::format_category_list;
use crate::error::BudgetResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
    },

    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Delete a category along with its transactions and budgets
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub async fn handle_category_command(
    storage: &Storage,
    cmd: CategoryCommands,
    json: bool,
) -> BudgetResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list_categories().await?;
            if json {
                print_json(&categories)?;
            } else {
                print!("{}", format_category_list(&categories));
            }
        }

        CategoryCommands::Add { name } => {
            let category = service.create_category(&name).await?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Rename { category, name } => {
            let cat = service.require_category(&category).await?;
            let renamed = service.rename_category(cat.id, &name).await?;
            println!("Renamed '{}' to '{}'", cat.name, renamed.name);
        }

        CategoryCommands::Delete { category } => {
            let cat = service.require_category(&category).await?;
            let removed = service.delete_category(cat.id).await?;
            println!("Deleted category: {}", cat.name);
            if removed > 0 {
                println!("  Removed {} transaction(s)", removed);
            }
        }
    }

    Ok(())
}
