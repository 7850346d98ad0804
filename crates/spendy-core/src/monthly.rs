//! Monthly income / expense / savings series.

use std::{collections::BTreeMap, fmt};

use chrono::{Datelike, NaiveDate};
use spendy_domain::{Cents, Transaction, TransactionKind};

/// How transactions are assigned to month buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthBucketing {
    /// One bucket per calendar month of each year.
    #[default]
    YearMonth,
    /// One bucket per month name; the same month of different years is merged.
    MonthName,
}

impl MonthBucketing {
    /// Parses a configuration value, falling back to [`MonthBucketing::YearMonth`].
    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" | "month-name" | "month_name" | "name" => MonthBucketing::MonthName,
            _ => MonthBucketing::YearMonth,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MonthBucketing::YearMonth => "year-month",
            MonthBucketing::MonthName => "month",
        }
    }
}

/// Key of a monthly bucket. `year` is `None` under [`MonthBucketing::MonthName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    pub year: Option<i32>,
    pub month: u32,
}

impl MonthBucket {
    pub fn for_date(date: NaiveDate, bucketing: MonthBucketing) -> Self {
        let year = match bucketing {
            MonthBucketing::YearMonth => Some(date.year()),
            MonthBucketing::MonthName => None,
        };
        Self {
            year,
            month: date.month(),
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = month_abbreviation(self.month);
        match self.year {
            Some(year) => write!(f, "{name} {year}"),
            None => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyTotals {
    pub income: Cents,
    pub expenses: Cents,
    pub savings: Cents,
    /// `savings / income * 100`, or `0` for months without income.
    pub savings_rate: f64,
}

/// Month buckets in chronological order. Only months with activity appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    buckets: BTreeMap<MonthBucket, MonthlyTotals>,
}

impl MonthlySeries {
    pub fn get(&self, bucket: &MonthBucket) -> Option<&MonthlyTotals> {
        self.buckets.get(bucket)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MonthBucket, &MonthlyTotals)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.buckets.keys().map(MonthBucket::label).collect()
    }
}

pub fn monthly_series(transactions: &[Transaction], bucketing: MonthBucketing) -> MonthlySeries {
    let mut buckets: BTreeMap<MonthBucket, MonthlyTotals> = BTreeMap::new();
    for txn in transactions {
        let entry = buckets
            .entry(MonthBucket::for_date(txn.date(), bucketing))
            .or_default();
        match txn.kind {
            TransactionKind::Income => entry.income += txn.amount,
            TransactionKind::Expense => entry.expenses += txn.amount,
        }
    }
    for totals in buckets.values_mut() {
        totals.savings = totals.income - totals.expenses;
        totals.savings_rate = if totals.income > Cents::ZERO {
            totals.savings.value() as f64 / totals.income.value() as f64 * 100.0
        } else {
            0.0
        };
    }
    MonthlySeries { buckets }
}

pub(crate) fn month_abbreviation(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
