//! The record store contract used by the services and the aggregation engine
//!
//! `Storage` implements it on top of the JSON ledger. Actual amounts are never
//! stored; they are summed from transactions on every call.

use async_trait::async_trait;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    category::validate_name, Category, CategoryId, ExpenseBudget, ExpenseTable, IncomeBudget,
    IncomeTable, Transaction, TransactionId,
};

use super::Storage;

/// Persistent record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_all_categories(&self) -> BudgetResult<Vec<Category>>;

    /// Create a category and return its assigned id
    async fn add_category(&self, name: &str) -> BudgetResult<CategoryId>;

    async fn update_category(&self, id: CategoryId, name: &str) -> BudgetResult<()>;

    /// Remove a category together with its transactions and expense budgets
    ///
    /// Returns the number of transactions removed.
    async fn delete_category_and_transactions(&self, id: CategoryId) -> BudgetResult<usize>;

    /// Insert or replace a transaction
    async fn save_transaction(&self, transaction: Transaction) -> BudgetResult<()>;

    /// All transactions, newest first
    async fn get_all_transactions(&self) -> BudgetResult<Vec<Transaction>>;

    async fn get_transactions_by_category(
        &self,
        category_id: CategoryId,
    ) -> BudgetResult<Vec<Transaction>>;

    /// Returns false when no transaction had that id
    async fn delete_transaction(&self, id: TransactionId) -> BudgetResult<bool>;

    /// Insert or overwrite the estimate for a category-month
    async fn save_expense_budget(&self, budget: ExpenseBudget) -> BudgetResult<()>;

    async fn get_expense_budgets(&self) -> BudgetResult<ExpenseTable>;

    /// Expense transactions summed per year, month and category
    async fn get_actual_expenses(&self) -> BudgetResult<ExpenseTable>;

    /// Insert or overwrite the income estimate for a month
    async fn save_income_budget(&self, budget: IncomeBudget) -> BudgetResult<()>;

    async fn get_income_budgets(&self) -> BudgetResult<IncomeTable>;

    /// Income transactions summed per year and month
    async fn get_actual_income(&self) -> BudgetResult<IncomeTable>;
}

impl Storage {
    fn require_category(&self, id: CategoryId) -> BudgetResult<Category> {
        self.categories
            .get(id)?
            .ok_or_else(|| BudgetError::category_not_found(id.to_string()))
    }

    fn check_unique_name(&self, name: &str, except: Option<CategoryId>) -> BudgetResult<()> {
        if let Some(existing) = self.categories.get_by_name(name)? {
            if Some(existing.id) != except {
                return Err(BudgetError::Duplicate {
                    entity_type: "Category",
                    identifier: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for Storage {
    async fn get_all_categories(&self) -> BudgetResult<Vec<Category>> {
        self.categories.get_all()
    }

    async fn add_category(&self, name: &str) -> BudgetResult<CategoryId> {
        let name = name.trim();
        validate_name(name).map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.check_unique_name(name, None)?;

        let category = self.categories.insert_new(name)?;
        self.commit().await?;

        self.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )
        .await;

        Ok(category.id)
    }

    async fn update_category(&self, id: CategoryId, name: &str) -> BudgetResult<()> {
        let name = name.trim();
        validate_name(name).map_err(|e| BudgetError::Validation(e.to_string()))?;

        let mut category = self.require_category(id)?;
        self.check_unique_name(name, Some(id))?;

        let before = category.clone();
        category.rename(name);
        self.categories.upsert(category.clone())?;
        self.commit().await?;

        self.log_upsert(
            EntityType::Category,
            id.to_string(),
            Some(category.name.clone()),
            Some(&before),
            &category,
        )
        .await;

        Ok(())
    }

    async fn delete_category_and_transactions(&self, id: CategoryId) -> BudgetResult<usize> {
        self.require_category(id)?;

        let category = self.categories.delete(id)?;
        let transactions = self.transactions.delete_by_category(id)?;
        let budgets = self.budgets.delete_for_category(id)?;
        self.commit().await?;

        tracing::debug!(
            category = %id,
            transactions = transactions.len(),
            budgets = budgets.len(),
            "deleted category"
        );

        let mut entries = Vec::with_capacity(1 + transactions.len() + budgets.len());
        if let Some(category) = &category {
            entries.push(AuditEntry::delete(
                EntityType::Category,
                id.to_string(),
                Some(category.name.clone()),
                category,
            ));
        }
        entries.extend(transactions.iter().map(|txn| {
            AuditEntry::delete(EntityType::Transaction, txn.id.to_string(), None, txn)
        }));
        entries.extend(budgets.iter().map(|budget| {
            AuditEntry::delete(
                EntityType::ExpenseBudget,
                budget.key().to_string(),
                None,
                budget,
            )
        }));
        self.record_audit(&entries).await;

        Ok(transactions.len())
    }

    async fn save_transaction(&self, transaction: Transaction) -> BudgetResult<()> {
        transaction
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.require_category(transaction.category_id)?;

        let previous = self.transactions.upsert(transaction.clone())?;
        self.commit().await?;

        self.log_upsert(
            EntityType::Transaction,
            transaction.id.to_string(),
            None,
            previous.as_ref(),
            &transaction,
        )
        .await;

        Ok(())
    }

    async fn get_all_transactions(&self) -> BudgetResult<Vec<Transaction>> {
        self.transactions.get_all()
    }

    async fn get_transactions_by_category(
        &self,
        category_id: CategoryId,
    ) -> BudgetResult<Vec<Transaction>> {
        self.transactions.get_by_category(category_id)
    }

    async fn delete_transaction(&self, id: TransactionId) -> BudgetResult<bool> {
        let Some(removed) = self.transactions.delete(id)? else {
            return Ok(false);
        };
        self.commit().await?;

        self.log_delete(EntityType::Transaction, id.to_string(), None, &removed)
            .await;

        Ok(true)
    }

    async fn save_expense_budget(&self, budget: ExpenseBudget) -> BudgetResult<()> {
        budget
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        let category = self.require_category(budget.category_id)?;

        let previous = self.budgets.upsert(budget.clone())?;
        self.commit().await?;

        self.log_upsert(
            EntityType::ExpenseBudget,
            budget.key().to_string(),
            Some(category.name),
            previous.as_ref(),
            &budget,
        )
        .await;

        Ok(())
    }

    async fn get_expense_budgets(&self) -> BudgetResult<ExpenseTable> {
        let mut table = ExpenseTable::new();
        for budget in self.budgets.get_all()? {
            table.set_amount(budget.year, budget.month, budget.category_id, budget.amount);
        }
        Ok(table)
    }

    async fn get_actual_expenses(&self) -> BudgetResult<ExpenseTable> {
        let mut table = ExpenseTable::new();
        for txn in self.transactions.get_all()? {
            if txn.is_expense() {
                let period = txn.period();
                table.add_amount(period.year, period.month, txn.category_id, txn.amount);
            }
        }
        Ok(table)
    }

    async fn save_income_budget(&self, budget: IncomeBudget) -> BudgetResult<()> {
        budget
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let previous = self.income.upsert(budget.clone())?;
        self.commit().await?;

        self.log_upsert(
            EntityType::IncomeBudget,
            budget.key().to_string(),
            None,
            previous.as_ref(),
            &budget,
        )
        .await;

        Ok(())
    }

    async fn get_income_budgets(&self) -> BudgetResult<IncomeTable> {
        let mut table = IncomeTable::new();
        for budget in self.income.get_all()? {
            table.insert(budget.year, budget.month, budget.amount);
        }
        Ok(table)
    }

    async fn get_actual_income(&self) -> BudgetResult<IncomeTable> {
        let mut table = IncomeTable::new();
        for txn in self.transactions.get_all()? {
            if txn.is_income() {
                let period = txn.period();
                table.add_amount(period.year, period.month, txn.amount);
            }
        }
        Ok(table)
    }
}
