use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgetwise::cli::{
    handle_audit_command, handle_budget_command, handle_category_command, handle_income_command,
    handle_report_command, handle_transaction_command,
};
use budgetwise::config::{
    paths::BudgetPaths,
    settings::{ProjectionPolicy, Settings},
};
use budgetwise::storage::{
    init::{initialize_storage, needs_initialization},
    Storage,
};

#[derive(Parser)]
#[command(
    name = "budgetwise",
    author = "Kaylee Beyene",
    version,
    about = "Terminal personal finance tracker",
    long_about = "budgetwise tracks income and expenses by category, compares them \
                  against monthly budgets and income estimates, flags overspending \
                  and projects typical months from past estimates."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(budgetwise::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(budgetwise::cli::TransactionCommands),

    /// Expense budget commands
    #[command(subcommand)]
    Budget(budgetwise::cli::BudgetCommands),

    /// Income estimate commands
    #[command(subcommand)]
    Income(budgetwise::cli::IncomeCommands),

    /// Reports
    #[command(subcommand)]
    Report(budgetwise::cli::ReportCommands),

    /// Show the most recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory and default categories
    Init,

    /// Show or change configuration
    Config {
        /// Set the currency symbol
        #[arg(long)]
        currency: Option<String>,
        /// Set the projection policy ("sparse-years" or "zero-fill-years")
        #[arg(long)]
        projection: Option<ProjectionPolicy>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    // Initialize paths and settings
    let paths = BudgetPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    if let Some(Commands::Config {
        currency,
        projection,
    }) = &cli.command
    {
        if currency.is_some() || projection.is_some() {
            if let Some(symbol) = currency {
                settings.currency_symbol = symbol.clone();
            }
            if let Some(policy) = projection {
                settings.projection_policy = *policy;
            }
            settings.save(&paths)?;
            println!("Configuration updated.");
        }

        println!("budgetwise Configuration");
        println!("========================");
        println!("Data directory:  {}", paths.data_dir().display());
        println!("Settings file:   {}", paths.settings_file().display());
        println!("Ledger file:     {}", paths.ledger_file().display());
        println!("Audit log:       {}", paths.audit_log().display());
        println!();
        println!("Settings:");
        println!("  Currency symbol:   {}", settings.currency_symbol);
        println!("  Projection policy: {}", settings.projection_policy);
        return Ok(());
    }

    // Initialize storage
    let storage = Storage::open(paths.clone()).await?;

    if matches!(cli.command, Some(Commands::Init)) {
        println!("Initializing budgetwise at: {}", paths.data_dir().display());
        let created = initialize_storage(&storage, &settings).await?;
        if !paths.settings_file().exists() {
            settings.save(&paths)?;
        }
        println!("Initialization complete!");
        if created > 0 {
            println!("Created {} default categories.", created);
        }
        println!();
        println!("Run 'budgetwise category list' to see all categories.");
        return Ok(());
    }

    if needs_initialization(&storage) {
        tracing::debug!("first run, seeding default categories");
        initialize_storage(&storage, &settings).await?;
    }

    let json = cli.json;
    match cli.command {
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd, json).await?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd, json).await?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd, json).await?;
        }
        Some(Commands::Income(cmd)) => {
            handle_income_command(&storage, &settings, cmd, json).await?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd, json).await?;
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&storage, limit, json).await?;
        }
        Some(Commands::Init) | Some(Commands::Config { .. }) => {}
        None => {
            println!("budgetwise - Terminal personal finance tracker");
            println!();
            println!("Run 'budgetwise --help' for usage information.");
        }
    }

    Ok(())
}
