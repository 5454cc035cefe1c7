//! Transaction service
//!
//! Recording, editing, deleting and searching income/expense transactions.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, Money, Transaction, TransactionId, TransactionKind};
use crate::storage::RecordStore;

/// Service for transaction management
pub struct TransactionService<'a, S: RecordStore> {
    store: &'a S,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by kind
    pub kind: Option<TransactionKind>,
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Filter by date range start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive match against description or category name
    pub text: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Money,
    pub date: NaiveDate,
    pub category_id: CategoryId,
    pub description: String,
}

/// Fields to change on an existing transaction; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
}

impl<'a, S: RecordStore> TransactionService<'a, S> {
    /// Create a new transaction service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Record a new transaction
    pub async fn record(&self, input: NewTransaction) -> BudgetResult<Transaction> {
        let txn = Transaction::new(input.kind, input.amount, input.date, input.category_id)
            .with_description(input.description.trim());

        self.store.save_transaction(txn.clone()).await?;
        Ok(txn)
    }

    /// Get a transaction by ID
    pub async fn get(&self, id: TransactionId) -> BudgetResult<Option<Transaction>> {
        Ok(self
            .store
            .get_all_transactions()
            .await?
            .into_iter()
            .find(|t| t.id == id))
    }

    /// Find a transaction by full id or by a unique prefix such as `txn-1a2b3c4d`
    pub async fn find(&self, identifier: &str) -> BudgetResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.get(id).await;
        }

        let prefix = identifier.trim();
        let prefix = prefix.strip_prefix("txn-").unwrap_or(prefix).to_lowercase();
        if prefix.is_empty() {
            return Ok(None);
        }

        let mut matches: Vec<_> = self
            .store
            .get_all_transactions()
            .await?
            .into_iter()
            .filter(|t| t.id.to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(BudgetError::Validation(format!(
                "Transaction id '{}' is ambiguous ({} matches)",
                identifier, n
            ))),
        }
    }

    /// Replace fields of an existing transaction
    pub async fn update(
        &self,
        id: TransactionId,
        changes: TransactionUpdate,
    ) -> BudgetResult<Transaction> {
        let mut txn = self
            .get(id)
            .await?
            .ok_or_else(|| BudgetError::transaction_not_found(id.to_string()))?;

        if let Some(kind) = changes.kind {
            txn.kind = kind;
        }
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(date) = changes.date {
            txn.date = date;
        }
        if let Some(category_id) = changes.category_id {
            txn.category_id = category_id;
        }
        if let Some(description) = changes.description {
            txn.description = description.trim().to_string();
        }
        txn.updated_at = Utc::now();

        self.store.save_transaction(txn.clone()).await?;
        Ok(txn)
    }

    /// Delete a transaction
    pub async fn delete(&self, id: TransactionId) -> BudgetResult<()> {
        if self.store.delete_transaction(id).await? {
            Ok(())
        } else {
            Err(BudgetError::transaction_not_found(id.to_string()))
        }
    }

    /// List transactions matching a filter, newest first
    pub async fn list(&self, filter: &TransactionFilter) -> BudgetResult<Vec<Transaction>> {
        let mut transactions = if let Some(category_id) = filter.category_id {
            self.store.get_transactions_by_category(category_id).await?
        } else {
            self.store.get_all_transactions().await?
        };

        if let Some(kind) = filter.kind {
            transactions.retain(|t| t.kind == kind);
        }
        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.date <= end);
        }

        if let Some(text) = filter.text.as_deref().map(str::trim) {
            if !text.is_empty() {
                let needle = text.to_lowercase();
                let names: BTreeMap<CategoryId, String> = self
                    .store
                    .get_all_categories()
                    .await?
                    .into_iter()
                    .map(|c| (c.id, c.name.to_lowercase()))
                    .collect();

                transactions.retain(|t| {
                    t.description.to_lowercase().contains(&needle)
                        || names
                            .get(&t.category_id)
                            .is_some_and(|name| name.contains(&needle))
                });
            }
        }

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// The most recent transactions
    pub async fn recent(&self, limit: usize) -> BudgetResult<Vec<Transaction>> {
        self.list(&TransactionFilter::new().limit(limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::storage::Storage;
    use tempfile::TempDir;

    async fn create_test_storage() -> (TempDir, Storage, CategoryId, CategoryId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).await.unwrap();
        let food = storage.add_category("Food").await.unwrap();
        let salary = storage.add_category("Salary").await.unwrap();
        (temp_dir, storage, food, salary)
    }

    fn new_txn(
        kind: TransactionKind,
        units: i64,
        day: u32,
        category_id: CategoryId,
        description: &str,
    ) -> NewTransaction {
        NewTransaction {
            kind,
            amount: Money::from_units(units),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            category_id,
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_and_get() {
        let (_temp, storage, food, _) = create_test_storage().await;
        let service = TransactionService::new(&storage);

        let txn = service
            .record(new_txn(TransactionKind::Expense, 120, 5, food, " weekly shop "))
            .await
            .unwrap();

        let fetched = service.get(txn.id).await.unwrap().unwrap();
        assert_eq!(fetched.description, "weekly shop");
        assert_eq!(fetched.amount, Money::from_units(120));
    }

    #[tokio::test]
    async fn test_record_validation() {
        let (_temp, storage, food, _) = create_test_storage().await;
        let service = TransactionService::new(&storage);

        let zero = service
            .record(new_txn(TransactionKind::Expense, 0, 5, food, ""))
            .await;
        assert!(zero.unwrap_err().is_validation());

        let long = "x".repeat(201);
        let too_long = service
            .record(new_txn(TransactionKind::Expense, 1, 5, food, &long))
            .await;
        assert!(too_long.unwrap_err().is_validation());

        let unknown = service
            .record(new_txn(TransactionKind::Expense, 1, 5, CategoryId::new(99), ""))
            .await;
        assert!(unknown.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_short_id() {
        let (_temp, storage, food, _) = create_test_storage().await;
        let service = TransactionService::new(&storage);
        let txn = service
            .record(new_txn(TransactionKind::Expense, 10, 1, food, ""))
            .await
            .unwrap();

        let by_short = service.find(&txn.id.short()).await.unwrap().unwrap();
        assert_eq!(by_short.id, txn.id);
        let by_full = service.find(&txn.id.to_string()).await.unwrap().unwrap();
        assert_eq!(by_full.id, txn.id);
        assert!(service.find("txn-zzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let (_temp, storage, food, salary) = create_test_storage().await;
        let service = TransactionService::new(&storage);
        let txn = service
            .record(new_txn(TransactionKind::Expense, 10, 1, food, "lunch"))
            .await
            .unwrap();

        let updated = service
            .update(
                txn.id,
                TransactionUpdate {
                    kind: Some(TransactionKind::Income),
                    amount: Some(Money::from_units(2000)),
                    category_id: Some(salary),
                    description: Some("pay".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.date, txn.date);
        assert_eq!(storage.get_all_transactions().await.unwrap().len(), 1);
        assert!(storage
            .get_transactions_by_category(food)
            .await
            .unwrap()
            .is_empty());

        let missing = service
            .update(TransactionId::new(), TransactionUpdate::default())
            .await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_temp, storage, food, _) = create_test_storage().await;
        let service = TransactionService::new(&storage);
        let txn = service
            .record(new_txn(TransactionKind::Expense, 10, 1, food, ""))
            .await
            .unwrap();

        service.delete(txn.id).await.unwrap();
        assert!(service.delete(txn.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (_temp, storage, food, salary) = create_test_storage().await;
        let service = TransactionService::new(&storage);

        service
            .record(new_txn(TransactionKind::Expense, 10, 2, food, "Bakery"))
            .await
            .unwrap();
        service
            .record(new_txn(TransactionKind::Expense, 20, 10, food, "Market"))
            .await
            .unwrap();
        service
            .record(new_txn(TransactionKind::Income, 2000, 1, salary, "March pay"))
            .await
            .unwrap();

        let all = service.list(&TransactionFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].description, "Market");

        let expenses = service
            .list(&TransactionFilter::new().kind(TransactionKind::Expense))
            .await
            .unwrap();
        assert_eq!(expenses.len(), 2);

        let by_text = service
            .list(&TransactionFilter::new().text("bak"))
            .await
            .unwrap();
        assert_eq!(by_text.len(), 1);

        // Text also matches the category name
        let by_category_name = service
            .list(&TransactionFilter::new().text("SALARY"))
            .await
            .unwrap();
        assert_eq!(by_category_name.len(), 1);

        let early = service
            .list(&TransactionFilter::new().date_range(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(early.len(), 2);

        let food_only = service
            .list(&TransactionFilter::new().category(food).limit(1))
            .await
            .unwrap();
        assert_eq!(food_only.len(), 1);
        assert_eq!(food_only[0].description, "Market");

        let recent = service.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
    }
}
