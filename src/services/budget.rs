//! Budget aggregation engine
//!
//! Holds four year → month tables rebuilt from the record store: estimated
//! and actual expenses per category, estimated and actual income. Every
//! query reads the cached tables; every mutation persists and then reloads.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::ProjectionPolicy;
use crate::error::BudgetResult;
use crate::models::{
    CategoryAmounts, CategoryId, ExpenseBudget, ExpenseTable, IncomeBudget, IncomeTable, Money,
    YearMonthTable,
};
use crate::storage::RecordStore;

/// Estimated vs actual income for a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncomeComparison {
    pub estimated: Money,
    pub actual: Money,
    /// `estimated - actual`
    pub delta: Money,
}

/// Spend against budget for one category in a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deviation {
    pub estimated: Money,
    pub actual: Money,
    /// `actual - estimated`; positive means overspent
    pub deviation: Money,
    pub flagged: bool,
}

/// A category and how many months it went over budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CriticalCategory {
    pub category_id: CategoryId,
    pub flag_count: usize,
}

/// Income and expense totals for a month, estimated and actual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyBalance {
    pub income_estimated: Money,
    pub income_actual: Money,
    pub expense_estimated: Money,
    pub expense_actual: Money,
    pub balance_estimated: Money,
    pub balance_real: Money,
}

/// In-memory aggregation over a record store
pub struct BudgetEngine<'a, S: RecordStore> {
    store: &'a S,
    policy: ProjectionPolicy,
    estimated_expenses: ExpenseTable,
    actual_expenses: ExpenseTable,
    estimated_income: IncomeTable,
    actual_income: IncomeTable,
    initialized: bool,
}

impl<'a, S: RecordStore> BudgetEngine<'a, S> {
    /// Create an empty engine; call [`initialize`](Self::initialize) before querying
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            policy: ProjectionPolicy::default(),
            estimated_expenses: ExpenseTable::new(),
            actual_expenses: ExpenseTable::new(),
            estimated_income: IncomeTable::new(),
            actual_income: IncomeTable::new(),
            initialized: false,
        }
    }

    pub fn with_policy(mut self, policy: ProjectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Rebuild all four tables from the store
    ///
    /// On failure the previous tables are kept.
    pub async fn initialize(&mut self) -> BudgetResult<()> {
        let estimated_expenses = self.store.get_expense_budgets().await?;
        let actual_expenses = self.store.get_actual_expenses().await?;
        let estimated_income = self.store.get_income_budgets().await?;
        let actual_income = self.store.get_actual_income().await?;

        self.estimated_expenses = estimated_expenses;
        self.actual_expenses = actual_expenses;
        self.estimated_income = estimated_income;
        self.actual_income = actual_income;
        self.initialized = true;

        tracing::debug!("budget engine reloaded");
        Ok(())
    }

    pub async fn reload(&mut self) -> BudgetResult<()> {
        self.initialize().await
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Set the estimated spend for a category-month and reload
    pub async fn set_expense_budget(
        &mut self,
        year: i32,
        month: u32,
        category_id: CategoryId,
        amount: Money,
    ) -> BudgetResult<()> {
        self.store
            .save_expense_budget(ExpenseBudget::new(year, month, category_id, amount))
            .await?;
        self.estimated_expenses
            .set_amount(year, month, category_id, amount);
        self.reload().await
    }

    /// Estimated spend per category for a month, empty when none
    pub fn expense_budget(&self, year: i32, month: u32) -> CategoryAmounts {
        self.estimated_expenses
            .get(year, month)
            .cloned()
            .unwrap_or_default()
    }

    /// `estimated - actual` for every budgeted category in a month
    pub fn compare_expense_budget(&self, year: i32, month: u32) -> BTreeMap<CategoryId, Money> {
        let actual = self.actual_expenses.get(year, month);

        self.expense_budget(year, month)
            .into_iter()
            .map(|(category, estimated)| {
                let spent = spent_in(actual, category);
                (category, estimated - spent)
            })
            .collect()
    }

    /// Average total estimated spend for a calendar month across years
    ///
    /// A naive seasonal baseline, formatted with two decimals.
    pub fn project_monthly_expenses(&self, month: u32) -> String {
        project(&self.estimated_expenses, month, self.policy, |amounts| {
            amounts.values().sum()
        })
    }

    /// Set the estimated income for a month and reload
    pub async fn set_income_estimate(
        &mut self,
        year: i32,
        month: u32,
        amount: Money,
    ) -> BudgetResult<()> {
        self.store
            .save_income_budget(IncomeBudget::new(year, month, amount))
            .await?;
        self.estimated_income.insert(year, month, amount);
        self.reload().await
    }

    pub fn income_estimate(&self, year: i32, month: u32) -> Money {
        self.estimated_income.amount(year, month)
    }

    pub fn actual_income(&self, year: i32, month: u32) -> Money {
        self.actual_income.amount(year, month)
    }

    pub fn compare_income(&self, year: i32, month: u32) -> IncomeComparison {
        let estimated = self.income_estimate(year, month);
        let actual = self.actual_income(year, month);
        IncomeComparison {
            estimated,
            actual,
            delta: estimated - actual,
        }
    }

    /// Average estimated income for a calendar month across years
    pub fn project_monthly_income(&self, month: u32) -> String {
        project(&self.estimated_income, month, self.policy, |amount| *amount)
    }

    /// Over/under spend for every budgeted category in a month
    pub fn compute_deviations(&self, year: i32, month: u32) -> BTreeMap<CategoryId, Deviation> {
        let actual = self.actual_expenses.get(year, month);

        self.expense_budget(year, month)
            .into_iter()
            .map(|(category, estimated)| {
                let spent = spent_in(actual, category);
                let deviation = spent - estimated;
                (
                    category,
                    Deviation {
                        estimated,
                        actual: spent,
                        deviation,
                        flagged: deviation.is_positive(),
                    },
                )
            })
            .collect()
    }

    /// Categories that went over budget, most frequent first
    ///
    /// Ties keep the order in which categories were first flagged, scanning
    /// years and months in ascending order.
    pub fn detect_critical_categories(&self) -> Vec<CriticalCategory> {
        let mut tally: Vec<CriticalCategory> = Vec::new();
        let mut position: HashMap<CategoryId, usize> = HashMap::new();

        for (year, month, _) in self.estimated_expenses.iter() {
            for (category_id, deviation) in self.compute_deviations(year, month) {
                if !deviation.flagged {
                    continue;
                }
                let index = *position.entry(category_id).or_insert_with(|| {
                    tally.push(CriticalCategory {
                        category_id,
                        flag_count: 0,
                    });
                    tally.len() - 1
                });
                tally[index].flag_count += 1;
            }
        }

        tally.sort_by(|a, b| b.flag_count.cmp(&a.flag_count));
        tally
    }

    pub fn monthly_balance(&self, year: i32, month: u32) -> MonthlyBalance {
        let income_estimated = self.income_estimate(year, month);
        let income_actual = self.actual_income(year, month);
        let expense_estimated = self.estimated_expenses.month_total(year, month);
        let expense_actual = self.actual_expenses.month_total(year, month);

        MonthlyBalance {
            income_estimated,
            income_actual,
            expense_estimated,
            expense_actual,
            balance_estimated: income_estimated - expense_estimated,
            balance_real: income_actual - expense_actual,
        }
    }

    /// Actual spend per category summed over every month of a year
    pub fn annual_category_totals(&self, year: i32) -> CategoryAmounts {
        let mut totals = CategoryAmounts::new();
        if let Some(months) = self.actual_expenses.months_of(year) {
            for amounts in months.values() {
                for (category, amount) in amounts {
                    *totals.entry(*category).or_default() += *amount;
                }
            }
        }
        totals
    }
}

fn spent_in(actual: Option<&CategoryAmounts>, category: CategoryId) -> Money {
    actual
        .and_then(|amounts| amounts.get(&category))
        .copied()
        .unwrap_or_default()
}

fn project<V>(
    table: &YearMonthTable<V>,
    month: u32,
    policy: ProjectionPolicy,
    month_total: impl Fn(&V) -> Money,
) -> String {
    let mut total = Money::zero();
    let mut samples = 0usize;

    for year in table.years() {
        match table.get(year, month) {
            Some(value) => {
                total += month_total(value);
                samples += 1;
            }
            None if policy == ProjectionPolicy::ZeroFillYears => samples += 1,
            None => {}
        }
    }

    Money::mean(total, samples).to_decimal_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::error::BudgetError;
    use crate::models::{Category, Transaction, TransactionId, TransactionKind};
    use crate::storage::Storage;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    async fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).await.unwrap();
        (temp_dir, storage)
    }

    async fn expense(store: &Storage, units: i64, y: i32, m: u32, cat: CategoryId) {
        store
            .save_transaction(Transaction::new(
                TransactionKind::Expense,
                Money::from_units(units),
                NaiveDate::from_ymd_opt(y, m, 15).unwrap(),
                cat,
            ))
            .await
            .unwrap();
    }

    async fn income(store: &Storage, units: i64, y: i32, m: u32, cat: CategoryId) {
        store
            .save_transaction(Transaction::new(
                TransactionKind::Income,
                Money::from_units(units),
                NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
                cat,
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_food_budget_end_to_end() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        engine.initialize().await.unwrap();
        engine
            .set_expense_budget(2024, 3, food, Money::from_units(300))
            .await
            .unwrap();
        expense(&storage, 120, 2024, 3, food).await;
        engine.reload().await.unwrap();

        let compare = engine.compare_expense_budget(2024, 3);
        assert_eq!(compare.len(), 1);
        assert_eq!(compare[&food], Money::from_units(180));

        let deviations = engine.compute_deviations(2024, 3);
        assert_eq!(
            deviations[&food],
            Deviation {
                estimated: Money::from_units(300),
                actual: Money::from_units(120),
                deviation: Money::from_units(-180),
                flagged: false,
            }
        );
    }

    #[tokio::test]
    async fn test_queries_before_initialize_are_empty() {
        let (_temp, storage) = create_test_storage().await;
        let engine = BudgetEngine::new(&storage);

        assert!(!engine.is_initialized());
        assert!(engine.expense_budget(2024, 1).is_empty());
        assert!(engine.compare_expense_budget(2024, 1).is_empty());
        assert!(engine.detect_critical_categories().is_empty());
        assert_eq!(engine.project_monthly_expenses(1), "0.00");
    }

    #[tokio::test]
    async fn test_unbudgeted_spend_is_ignored_by_comparisons() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();
        let fun = storage.add_category("Leisure").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        engine
            .set_expense_budget(2024, 3, food, Money::from_units(100))
            .await
            .unwrap();
        expense(&storage, 500, 2024, 3, fun).await;
        engine.reload().await.unwrap();

        let compare = engine.compare_expense_budget(2024, 3);
        assert_eq!(compare.keys().copied().collect::<Vec<_>>(), vec![food]);
        assert_eq!(compare[&food], Money::from_units(100));
        assert!(!engine.compute_deviations(2024, 3).contains_key(&fun));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        engine
            .set_expense_budget(2024, 3, food, Money::from_units(300))
            .await
            .unwrap();
        engine
            .set_expense_budget(2024, 3, food, Money::from_units(200))
            .await
            .unwrap();
        engine
            .set_income_estimate(2024, 3, Money::from_units(1000))
            .await
            .unwrap();
        engine
            .set_income_estimate(2024, 3, Money::from_units(1500))
            .await
            .unwrap();

        assert_eq!(engine.expense_budget(2024, 3)[&food], Money::from_units(200));
        assert_eq!(engine.income_estimate(2024, 3), Money::from_units(1500));
    }

    #[tokio::test]
    async fn test_zero_deviation_is_not_flagged() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        engine
            .set_expense_budget(2024, 5, food, Money::from_units(80))
            .await
            .unwrap();
        expense(&storage, 80, 2024, 5, food).await;
        engine.reload().await.unwrap();

        let deviation = engine.compute_deviations(2024, 5)[&food];
        assert!(deviation.deviation.is_zero());
        assert!(!deviation.flagged);
        assert!(engine.detect_critical_categories().is_empty());
    }

    #[tokio::test]
    async fn test_projection_sparse_years() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();
        let rent = storage.add_category("Rent").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        assert_eq!(engine.project_monthly_expenses(1), "0.00");

        engine
            .set_expense_budget(2023, 1, food, Money::from_units(100))
            .await
            .unwrap();
        engine
            .set_expense_budget(2024, 1, food, Money::from_units(150))
            .await
            .unwrap();
        engine
            .set_expense_budget(2024, 1, rent, Money::from_units(50))
            .await
            .unwrap();
        // A year with a budget only in another month does not count
        engine
            .set_expense_budget(2025, 2, food, Money::from_units(999))
            .await
            .unwrap();

        // (100 + 200) / 2
        assert_eq!(engine.project_monthly_expenses(1), "150.00");
        assert_eq!(engine.project_monthly_expenses(3), "0.00");
    }

    #[tokio::test]
    async fn test_projection_zero_fill_years() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();

        let mut engine =
            BudgetEngine::new(&storage).with_policy(ProjectionPolicy::ZeroFillYears);
        engine
            .set_expense_budget(2023, 1, food, Money::from_units(300))
            .await
            .unwrap();
        engine
            .set_expense_budget(2024, 6, food, Money::from_units(10))
            .await
            .unwrap();
        engine
            .set_income_estimate(2023, 1, Money::from_units(100))
            .await
            .unwrap();
        engine
            .set_income_estimate(2024, 2, Money::from_units(100))
            .await
            .unwrap();
        engine
            .set_income_estimate(2025, 2, Money::from_units(100))
            .await
            .unwrap();

        assert_eq!(engine.project_monthly_expenses(1), "150.00");
        assert_eq!(engine.project_monthly_income(1), "33.33");
    }

    #[tokio::test]
    async fn test_income_projection_and_comparison() {
        let (_temp, storage) = create_test_storage().await;
        let salary = storage.add_category("Salary").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        engine
            .set_income_estimate(2024, 1, Money::from_units(1000))
            .await
            .unwrap();
        engine
            .set_income_estimate(2025, 1, Money::from_cents(100_001))
            .await
            .unwrap();
        income(&storage, 1200, 2025, 1, salary).await;
        engine.reload().await.unwrap();

        assert_eq!(engine.project_monthly_income(1), "1000.01");
        assert_eq!(engine.project_monthly_income(2), "0.00");

        let comparison = engine.compare_income(2025, 1);
        assert_eq!(comparison.actual, Money::from_units(1200));
        assert_eq!(comparison.delta, Money::from_cents(100_001) - Money::from_units(1200));

        let empty = engine.compare_income(2030, 1);
        assert_eq!(empty.estimated, Money::zero());
        assert_eq!(empty.delta, Money::zero());
    }

    #[tokio::test]
    async fn test_zero_income_estimate_counts_as_sample() {
        let (_temp, storage) = create_test_storage().await;

        let mut engine = BudgetEngine::new(&storage);
        engine
            .set_income_estimate(2023, 6, Money::zero())
            .await
            .unwrap();
        engine
            .set_income_estimate(2024, 6, Money::from_units(900))
            .await
            .unwrap();

        assert_eq!(engine.project_monthly_income(6), "450.00");
    }

    #[tokio::test]
    async fn test_critical_categories_ordering() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();
        let transport = storage.add_category("Transport").await.unwrap();
        let health = storage.add_category("Health").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        for month in 1..=3 {
            for cat in [food, transport, health] {
                engine
                    .set_expense_budget(2024, month, cat, Money::from_units(10))
                    .await
                    .unwrap();
            }
        }
        // transport over in Jan and Feb; health over in Mar; food over in Feb and Mar
        expense(&storage, 11, 2024, 1, transport).await;
        expense(&storage, 11, 2024, 2, transport).await;
        expense(&storage, 11, 2024, 2, food).await;
        expense(&storage, 11, 2024, 3, food).await;
        expense(&storage, 11, 2024, 3, health).await;
        engine.reload().await.unwrap();

        let critical = engine.detect_critical_categories();
        assert_eq!(
            critical,
            vec![
                CriticalCategory {
                    category_id: transport,
                    flag_count: 2
                },
                CriticalCategory {
                    category_id: food,
                    flag_count: 2
                },
                CriticalCategory {
                    category_id: health,
                    flag_count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_monthly_balance_identities() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();
        let salary = storage.add_category("Salary").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        engine.initialize().await.unwrap();

        let zero = engine.monthly_balance(2024, 3);
        assert_eq!(zero.balance_estimated, Money::zero());
        assert_eq!(zero.balance_real, Money::zero());

        engine
            .set_income_estimate(2024, 3, Money::from_units(2000))
            .await
            .unwrap();
        engine
            .set_expense_budget(2024, 3, food, Money::from_units(300))
            .await
            .unwrap();
        income(&storage, 1800, 2024, 3, salary).await;
        expense(&storage, 450, 2024, 3, food).await;
        engine.reload().await.unwrap();

        let balance = engine.monthly_balance(2024, 3);
        assert_eq!(balance.expense_actual, Money::from_units(450));
        assert_eq!(
            balance.balance_estimated,
            balance.income_estimated - balance.expense_estimated
        );
        assert_eq!(
            balance.balance_real,
            balance.income_actual - balance.expense_actual
        );
        assert_eq!(balance.balance_real, Money::from_units(1350));
    }

    #[tokio::test]
    async fn test_annual_category_totals() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();
        let rent = storage.add_category("Rent").await.unwrap();

        expense(&storage, 100, 2024, 1, food).await;
        expense(&storage, 50, 2024, 7, food).await;
        expense(&storage, 900, 2024, 7, rent).await;
        expense(&storage, 5, 2023, 12, food).await;

        let mut engine = BudgetEngine::new(&storage);
        engine.initialize().await.unwrap();

        let totals = engine.annual_category_totals(2024);
        assert_eq!(totals[&food], Money::from_units(150));
        assert_eq!(totals[&rent], Money::from_units(900));
        assert!(engine.annual_category_totals(2022).is_empty());
    }

    #[tokio::test]
    async fn test_reload_picks_up_cascade_delete() {
        let (_temp, storage) = create_test_storage().await;
        let food = storage.add_category("Food").await.unwrap();

        let mut engine = BudgetEngine::new(&storage);
        engine
            .set_expense_budget(2024, 3, food, Money::from_units(300))
            .await
            .unwrap();
        expense(&storage, 120, 2024, 3, food).await;

        storage.delete_category_and_transactions(food).await.unwrap();
        // Stale until reloaded
        assert_eq!(engine.expense_budget(2024, 3).len(), 1);

        engine.reload().await.unwrap();
        assert!(engine.expense_budget(2024, 3).is_empty());
        assert!(engine.annual_category_totals(2024).is_empty());
    }

    /// A store whose every call fails
    struct UnavailableStore;

    fn unavailable<T>() -> BudgetResult<T> {
        Err(BudgetError::Storage("store unavailable".into()))
    }

    #[async_trait]
    impl RecordStore for UnavailableStore {
        async fn get_all_categories(&self) -> BudgetResult<Vec<Category>> {
            unavailable()
        }
        async fn add_category(&self, _name: &str) -> BudgetResult<CategoryId> {
            unavailable()
        }
        async fn update_category(&self, _id: CategoryId, _name: &str) -> BudgetResult<()> {
            unavailable()
        }
        async fn delete_category_and_transactions(&self, _id: CategoryId) -> BudgetResult<usize> {
            unavailable()
        }
        async fn save_transaction(&self, _transaction: Transaction) -> BudgetResult<()> {
            unavailable()
        }
        async fn get_all_transactions(&self) -> BudgetResult<Vec<Transaction>> {
            unavailable()
        }
        async fn get_transactions_by_category(
            &self,
            _category_id: CategoryId,
        ) -> BudgetResult<Vec<Transaction>> {
            unavailable()
        }
        async fn delete_transaction(&self, _id: TransactionId) -> BudgetResult<bool> {
            unavailable()
        }
        async fn save_expense_budget(&self, _budget: ExpenseBudget) -> BudgetResult<()> {
            unavailable()
        }
        async fn get_expense_budgets(&self) -> BudgetResult<ExpenseTable> {
            unavailable()
        }
        async fn get_actual_expenses(&self) -> BudgetResult<ExpenseTable> {
            unavailable()
        }
        async fn save_income_budget(&self, _budget: IncomeBudget) -> BudgetResult<()> {
            unavailable()
        }
        async fn get_income_budgets(&self) -> BudgetResult<IncomeTable> {
            unavailable()
        }
        async fn get_actual_income(&self) -> BudgetResult<IncomeTable> {
            unavailable()
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = UnavailableStore;
        let mut engine = BudgetEngine::new(&store);

        assert!(engine.initialize().await.unwrap_err().is_storage());
        assert!(!engine.is_initialized());

        let err = engine
            .set_expense_budget(2024, 1, CategoryId::new(1), Money::from_units(1))
            .await
            .unwrap_err();
        assert!(err.is_storage());
        // Nothing cached when the write failed
        assert!(engine.expense_budget(2024, 1).is_empty());
    }
}
