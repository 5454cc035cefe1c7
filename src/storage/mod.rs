//! Storage layer for budgetwise
//!
//! All records live in one JSON snapshot (`data/ledger.json`) written
//! atomically, so a multi-record change such as a cascading category delete
//! lands on disk as a single commit.

pub mod budget;
pub mod categories;
pub mod file_io;
pub mod income;
pub mod init;
pub mod record_store;
pub mod transactions;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use income::IncomeRepository;
pub use init::initialize_storage;
pub use record_store::RecordStore;
pub use transactions::TransactionRepository;

use serde::{Deserialize, Serialize};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::models::{Category, CategoryId, ExpenseBudget, IncomeBudget, Transaction};

/// On-disk layout of `ledger.json`
#[derive(Debug, Serialize, Deserialize)]
struct LedgerData {
    #[serde(default = "first_category_id")]
    next_category_id: CategoryId,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    expense_budgets: Vec<ExpenseBudget>,
    #[serde(default)]
    income_budgets: Vec<IncomeBudget>,
}

fn first_category_id() -> CategoryId {
    CategoryId::new(1)
}

impl Default for LedgerData {
    fn default() -> Self {
        Self {
            next_category_id: first_category_id(),
            categories: Vec::new(),
            transactions: Vec::new(),
            expense_budgets: Vec::new(),
            income_budgets: Vec::new(),
        }
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    audit: AuditLogger,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub income: IncomeRepository,
}

impl Storage {
    /// Create the directories and load whatever is on disk
    pub async fn open(paths: BudgetPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        let storage = Self {
            audit: AuditLogger::new(paths.audit_log()),
            categories: CategoryRepository::new(),
            transactions: TransactionRepository::new(),
            budgets: BudgetRepository::new(),
            income: IncomeRepository::new(),
            paths,
        };
        storage.load_all().await?;

        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    /// Replace every repository with the contents of `ledger.json`
    pub async fn load_all(&self) -> Result<(), BudgetError> {
        let data: LedgerData = read_json(self.paths.ledger_file()).await?;

        self.categories
            .replace_all(data.categories, data.next_category_id)?;
        self.transactions.replace_all(data.transactions)?;
        self.budgets.replace_all(data.expense_budgets)?;
        self.income.replace_all(data.income_budgets)?;

        tracing::debug!(
            categories = self.categories.count()?,
            transactions = self.transactions.count()?,
            "loaded ledger"
        );
        Ok(())
    }

    /// Write every repository to `ledger.json` in one atomic write
    pub async fn save_all(&self) -> Result<(), BudgetError> {
        let (categories, next_category_id) = self.categories.snapshot()?;
        let mut transactions = self.transactions.get_all()?;
        transactions.reverse();

        let data = LedgerData {
            next_category_id,
            categories,
            transactions,
            expense_budgets: self.budgets.get_all()?,
            income_budgets: self.income.get_all()?,
        };

        write_json_atomic(self.paths.ledger_file(), &data).await
    }

    /// Persist in-memory changes, reverting them if the write fails
    pub(crate) async fn commit(&self) -> Result<(), BudgetError> {
        if let Err(err) = self.save_all().await {
            tracing::warn!(error = %err, "commit failed, reloading ledger from disk");
            if let Err(reload_err) = self.load_all().await {
                tracing::warn!(error = %reload_err, "reload after failed commit also failed");
            }
            return Err(err);
        }
        Ok(())
    }

    /// Check if the ledger has been written at least once
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Append audit entries; the data is already committed, so a failure only warns
    pub(crate) async fn record_audit(&self, entries: &[AuditEntry]) {
        if let Err(err) = self.audit.log_batch(entries).await {
            tracing::warn!(error = %err, "failed to write audit log");
        }
    }

    pub(crate) async fn log_create<T: Serialize + Sync>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) {
        let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity);
        self.record_audit(std::slice::from_ref(&entry)).await;
    }

    pub(crate) async fn log_upsert<T: Serialize + Sync>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        previous: Option<&T>,
        current: &T,
    ) {
        let entry = AuditEntry::upsert(entity_type, entity_id, entity_name, previous, current);
        self.record_audit(std::slice::from_ref(&entry)).await;
    }

    pub(crate) async fn log_delete<T: Serialize + Sync>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) {
        let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity);
        self.record_audit(std::slice::from_ref(&entry)).await;
    }

    /// Audit log handle, for reading entries back
    pub fn audit_log(&self) -> &AuditLogger {
        &self.audit
    }
}
