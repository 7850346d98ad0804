//! Search, date-range filtering and stable sorting for transaction listings.
//!
//! Filter values come straight from presentation code, so parsing never fails:
//! anything outside the known values falls back to the default.

use std::{cmp::Ordering, fmt};

use chrono::{Duration, Months, NaiveDateTime};
use spendy_domain::Transaction;

/// Trailing window relative to a reference "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    Year,
}

impl DateRange {
    pub const ALL: [DateRange; 7] = [
        DateRange::All,
        DateRange::Today,
        DateRange::Week,
        DateRange::Month,
        DateRange::ThreeMonths,
        DateRange::SixMonths,
        DateRange::Year,
    ];

    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => DateRange::Today,
            "week" => DateRange::Week,
            "month" => DateRange::Month,
            "3months" => DateRange::ThreeMonths,
            "6months" => DateRange::SixMonths,
            "year" => DateRange::Year,
            _ => DateRange::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::ThreeMonths => "3months",
            DateRange::SixMonths => "6months",
            DateRange::Year => "year",
        }
    }

    /// Earliest timestamp (inclusive) kept by the range, or `None` when unbounded.
    pub fn lower_bound(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            DateRange::All => None,
            DateRange::Today => now.date().and_hms_opt(0, 0, 0),
            DateRange::Week => now.checked_sub_signed(Duration::days(7)),
            DateRange::Month => now.checked_sub_months(Months::new(1)),
            DateRange::ThreeMonths => now.checked_sub_months(Months::new(3)),
            DateRange::SixMonths => now.checked_sub_months(Months::new(6)),
            DateRange::Year => now.checked_sub_months(Months::new(12)),
        }
    }

    pub fn contains(self, at: NaiveDateTime, now: NaiveDateTime) -> bool {
        self.lower_bound(now).map_or(true, |bound| at >= bound)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateRange::All => "All Time",
            DateRange::Today => "Today",
            DateRange::Week => "Last 7 Days",
            DateRange::Month => "Last Month",
            DateRange::ThreeMonths => "Last 3 Months",
            DateRange::SixMonths => "Last 6 Months",
            DateRange::Year => "Last Year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Date,
    Amount,
}

impl SortBy {
    pub const ALL: [SortBy; 2] = [SortBy::Date, SortBy::Amount];

    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "amount" => SortBy::Amount,
            _ => SortBy::Date,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Amount => "amount",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Listing criteria chosen in the reporting view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub search_query: String,
    pub date_range: DateRange,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl TransactionFilter {
    /// Builds a filter from raw presentation values, defaulting anything unrecognised.
    pub fn from_values(search_query: &str, date_range: &str, sort_by: &str, sort_order: &str) -> Self {
        Self {
            search_query: search_query.to_string(),
            date_range: DateRange::from_value(date_range),
            sort_by: SortBy::from_value(sort_by),
            sort_order: SortOrder::from_value(sort_order),
        }
    }

    /// Case-insensitive substring match on description or category label.
    pub fn matches_search(&self, txn: &Transaction) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let needle = self.search_query.to_lowercase();
        txn.description.to_lowercase().contains(&needle)
            || txn.category.label().to_lowercase().contains(&needle)
    }
}

/// Applies search and date range relative to `now`, then sorts stably.
///
/// Transactions with equal sort keys keep their input order in either direction.
pub fn filter_and_sort(
    transactions: &[Transaction],
    filter: &TransactionFilter,
    now: NaiveDateTime,
) -> Vec<Transaction> {
    let lower_bound = filter.date_range.lower_bound(now);
    let mut matched: Vec<Transaction> = transactions
        .iter()
        .filter(|txn| filter.matches_search(txn))
        .filter(|txn| lower_bound.map_or(true, |bound| txn.occurred_at >= bound))
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        let ordering = match filter.sort_by {
            SortBy::Date => a.occurred_at.cmp(&b.occurred_at),
            SortBy::Amount => a.amount.cmp(&b.amount),
        };
        filter.sort_order.apply(ordering)
    });
    matched
}
