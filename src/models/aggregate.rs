//! Nested year → month aggregate tables
//!
//! The engine keeps four of these: estimated and actual expenses (per
//! category), estimated and actual income (scalar). Ordered maps give a
//! stable year/month/category iteration order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::CategoryId;
use super::money::Money;

/// Amounts keyed by category
pub type CategoryAmounts = BTreeMap<CategoryId, Money>;

/// `table[year][month][category] = amount`
pub type ExpenseTable = YearMonthTable<CategoryAmounts>;

/// `table[year][month] = amount`
pub type IncomeTable = YearMonthTable<Money>;

/// A value per (year, month), sparse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearMonthTable<V>(BTreeMap<i32, BTreeMap<u32, V>>);

impl<V> Default for YearMonthTable<V> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<V> YearMonthTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, year: i32, month: u32) -> Option<&V> {
        self.0.get(&year).and_then(|months| months.get(&month))
    }

    /// Replace the value for a month
    pub fn insert(&mut self, year: i32, month: u32, value: V) {
        self.0.entry(year).or_default().insert(month, value);
    }

    /// All months recorded for a year
    pub fn months_of(&self, year: i32) -> Option<&BTreeMap<u32, V>> {
        self.0.get(&year)
    }

    /// Years with at least one month recorded
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.keys().copied()
    }

    /// Every (year, month, value) in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (i32, u32, &V)> + '_ {
        self.0.iter().flat_map(|(year, months)| {
            months
                .iter()
                .map(move |(month, value)| (*year, *month, value))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|months| months.is_empty())
    }
}

impl<V: Default> YearMonthTable<V> {
    /// Mutable access to a month, creating it when absent
    pub fn entry(&mut self, year: i32, month: u32) -> &mut V {
        self.0.entry(year).or_default().entry(month).or_default()
    }
}

impl ExpenseTable {
    /// Overwrite the amount for a category in a month
    pub fn set_amount(&mut self, year: i32, month: u32, category: CategoryId, amount: Money) {
        self.entry(year, month).insert(category, amount);
    }

    /// Accumulate into the amount for a category in a month
    pub fn add_amount(&mut self, year: i32, month: u32, category: CategoryId, amount: Money) {
        *self.entry(year, month).entry(category).or_default() += amount;
    }

    /// Sum across categories for a month (zero when absent)
    pub fn month_total(&self, year: i32, month: u32) -> Money {
        self.get(year, month)
            .map(|amounts| amounts.values().sum())
            .unwrap_or_default()
    }
}

impl IncomeTable {
    /// Accumulate into the amount for a month
    pub fn add_amount(&mut self, year: i32, month: u32, amount: Money) {
        *self.entry(year, month) += amount;
    }

    /// The amount for a month (zero when absent)
    pub fn amount(&self, year: i32, month: u32) -> Money {
        self.get(year, month).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_table_set_and_add() {
        let food = CategoryId::new(1);
        let mut table = ExpenseTable::new();
        assert!(table.is_empty());

        table.set_amount(2024, 3, food, Money::from_units(300));
        table.set_amount(2024, 3, food, Money::from_units(250));
        assert_eq!(table.get(2024, 3).unwrap()[&food], Money::from_units(250));

        table.add_amount(2024, 4, food, Money::from_units(10));
        table.add_amount(2024, 4, food, Money::from_units(15));
        assert_eq!(table.get(2024, 4).unwrap()[&food], Money::from_units(25));
        assert!(!table.is_empty());
    }

    #[test]
    fn test_month_total() {
        let mut table = ExpenseTable::new();
        table.set_amount(2024, 3, CategoryId::new(1), Money::from_units(100));
        table.set_amount(2024, 3, CategoryId::new(2), Money::from_units(50));

        assert_eq!(table.month_total(2024, 3), Money::from_units(150));
        assert_eq!(table.month_total(2024, 4), Money::zero());
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut table = IncomeTable::new();
        table.add_amount(2025, 1, Money::from_units(1));
        table.add_amount(2024, 12, Money::from_units(2));
        table.add_amount(2024, 2, Money::from_units(3));

        let keys: Vec<_> = table.iter().map(|(y, m, _)| (y, m)).collect();
        assert_eq!(keys, vec![(2024, 2), (2024, 12), (2025, 1)]);
        assert_eq!(table.years().collect::<Vec<_>>(), vec![2024, 2025]);
    }

    #[test]
    fn test_income_amount_defaults_to_zero() {
        let table = IncomeTable::new();
        assert_eq!(table.amount(2024, 1), Money::zero());
    }

    #[test]
    fn test_serializes_as_nested_object() {
        let mut table = ExpenseTable::new();
        table.set_amount(2024, 3, CategoryId::new(2), Money::from_cents(500));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"2024":{"3":{"2":500}}}"#);

        let back: ExpenseTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
