//! Pure reductions over a transaction list: totals, day groups and category sums.
//!
//! Every function takes an immutable snapshot and returns a freshly built value,
//! so calling one twice on the same input yields equal output.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use spendy_domain::{Category, Cents, Transaction, TransactionKind};

/// Running income, expense and balance figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_income: Cents,
    pub total_expenses: Cents,
    /// `total_income - total_expenses`; negative when spending exceeds income.
    pub balance: Cents,
}

/// Transactions sharing one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
}

impl DateGroup {
    /// Net effect of the day: income minus expenses.
    pub fn net(&self) -> Cents {
        self.transactions.iter().map(Transaction::signed_amount).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Cents,
}

/// Summed expense amounts per category, in first-seen order.
///
/// Categories without expenses are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    entries: Vec<CategoryTotal>,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> Option<Cents> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chart labels in insertion order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.category.label()).collect()
    }

    pub fn total(&self) -> Cents {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    /// Share of total spending per category, as percentages.
    pub fn shares(&self) -> Vec<(Category, f64)> {
        let total = self.total();
        self.entries
            .iter()
            .map(|entry| {
                let share = if total > Cents::ZERO {
                    entry.amount.value() as f64 / total.value() as f64 * 100.0
                } else {
                    0.0
                };
                (entry.category, share)
            })
            .collect()
    }

    fn add(&mut self, category: Category, amount: Cents) {
        match self.entries.iter_mut().find(|entry| entry.category == category) {
            Some(entry) => entry.amount += amount,
            None => self.entries.push(CategoryTotal { category, amount }),
        }
    }
}

pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for txn in transactions {
        match txn.kind {
            TransactionKind::Income => totals.total_income += txn.amount,
            TransactionKind::Expense => totals.total_expenses += txn.amount,
        }
    }
    totals.balance = totals.total_income - totals.total_expenses;
    totals
}

/// Partitions transactions by the calendar date of `occurred_at`, newest date first.
///
/// Inside a group transactions keep the order they arrived in.
pub fn group_by_date(transactions: &[Transaction]) -> Vec<DateGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
    for txn in transactions {
        days.entry(txn.date()).or_default().push(txn.clone());
    }
    days.into_iter()
        .rev()
        .map(|(date, transactions)| DateGroup { date, transactions })
        .collect()
}

/// Sums expense amounts per category. Income never contributes.
pub fn category_totals(transactions: &[Transaction]) -> CategoryTotals {
    let mut totals = CategoryTotals::default();
    for txn in transactions.iter().filter(|txn| txn.is_expense()) {
        totals.add(txn.category, txn.amount);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::txn;

    #[test]
    fn empty_input_yields_zero_totals_and_no_groups() {
        assert_eq!(compute_totals(&[]), Totals::default());
        assert!(group_by_date(&[]).is_empty());
        assert!(category_totals(&[]).is_empty());
    }

    #[test]
    fn salary_and_two_food_expenses_aggregate() {
        let list = vec![
            txn(TransactionKind::Income, Category::Salary, 100_000, "2024-01-05"),
            txn(TransactionKind::Expense, Category::Food, 30_000, "2024-01-05"),
            txn(TransactionKind::Expense, Category::Food, 20_000, "2024-02-01"),
        ];

        let totals = compute_totals(&list);
        assert_eq!(totals.total_income, Cents::from_major(1000));
        assert_eq!(totals.total_expenses, Cents::from_major(500));
        assert_eq!(totals.balance, Cents::from_major(500));

        let categories = category_totals(&list);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories.get(Category::Food), Some(Cents::from_major(500)));

        let groups = group_by_date(&list);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(groups[0].transactions.len(), 1);
        assert_eq!(groups[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(groups[1].transactions.len(), 2);
        assert_eq!(groups[1].transactions[0], list[0]);
        assert_eq!(groups[1].transactions[1], list[1]);
    }

    #[test]
    fn balance_may_go_negative() {
        let list = vec![
            txn(TransactionKind::Income, Category::Freelance, 1_000, "2024-03-01"),
            txn(TransactionKind::Expense, Category::Housing, 5_000, "2024-03-02"),
        ];
        let totals = compute_totals(&list);
        assert_eq!(totals.balance, Cents::new(-4_000));
        assert_eq!(totals.balance, totals.total_income - totals.total_expenses);
    }

    #[test]
    fn date_groups_partition_input_in_strictly_descending_order() {
        let list = vec![
            txn(TransactionKind::Expense, Category::Food, 100, "2024-03-02T08:00:00"),
            txn(TransactionKind::Expense, Category::Other, 200, "2024-01-15"),
            txn(TransactionKind::Income, Category::Salary, 300, "2024-03-02T21:15:00"),
            txn(TransactionKind::Expense, Category::Shopping, 400, "2024-02-10"),
            txn(TransactionKind::Expense, Category::Food, 500, "2024-01-15T12:00:00"),
        ];
        let groups = group_by_date(&list);

        let dates: Vec<_> = groups.iter().map(|group| group.date).collect();
        assert!(dates.windows(2).all(|pair| pair[0] > pair[1]));

        let mut seen: Vec<_> = groups
            .iter()
            .flat_map(|group| group.transactions.iter().map(|t| t.id))
            .collect();
        let mut expected: Vec<_> = list.iter().map(|t| t.id).collect();
        seen.sort_by_key(|id| id.to_string());
        expected.sort_by_key(|id| id.to_string());
        assert_eq!(seen, expected);

        let march = &groups[0];
        assert_eq!(march.transactions[0].amount, Cents::new(100));
        assert_eq!(march.transactions[1].amount, Cents::new(300));
        assert_eq!(march.net(), Cents::new(200));
    }

    #[test]
    fn category_totals_exclude_income_and_keep_first_seen_order() {
        let list = vec![
            txn(TransactionKind::Expense, Category::Transportation, 1_250, "2024-04-01"),
            txn(TransactionKind::Income, Category::Salary, 90_000, "2024-04-01"),
            txn(TransactionKind::Expense, Category::Food, 800, "2024-04-02"),
            txn(TransactionKind::Expense, Category::Transportation, 750, "2024-04-03"),
        ];
        let categories = category_totals(&list);
        assert_eq!(categories.labels(), vec!["Transportation", "Food"]);
        assert_eq!(categories.get(Category::Transportation), Some(Cents::new(2_000)));
        assert_eq!(categories.get(Category::Salary), None);
        assert_eq!(categories.total(), compute_totals(&list).total_expenses);

        let shares = categories.shares();
        assert!((shares[0].1 - 71.428_571).abs() < 1e-3);
    }

    #[test]
    fn aggregations_are_idempotent() {
        let list = vec![
            txn(TransactionKind::Expense, Category::Utilities, 4_200, "2024-05-01"),
            txn(TransactionKind::Income, Category::Business, 10_000, "2024-05-03"),
        ];
        assert_eq!(compute_totals(&list), compute_totals(&list));
        assert_eq!(group_by_date(&list), group_by_date(&list));
        assert_eq!(category_totals(&list), category_totals(&list));
    }
}
