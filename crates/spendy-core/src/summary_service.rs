use chrono::NaiveDateTime;
use spendy_domain::Transaction;
use tracing::debug;

use crate::{
    aggregation::{category_totals, compute_totals, group_by_date, CategoryTotals, DateGroup, Totals},
    filter::{filter_and_sort, TransactionFilter},
    monthly::{monthly_series, MonthBucketing, MonthlySeries},
    pagination::{Paginator, DEFAULT_PAGE_SIZE},
};

/// What the reporting view asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub filter: TransactionFilter,
    /// 1-based; clamped against the filtered listing.
    pub page: usize,
    pub page_size: usize,
    pub bucketing: MonthBucketing,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            filter: TransactionFilter::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            bucketing: MonthBucketing::default(),
        }
    }
}

/// One page of the filtered listing, grouped by day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub groups: Vec<DateGroup>,
    pub page: usize,
    pub total_pages: usize,
    /// Number of transactions that passed the filter.
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Everything the reports screen shows at once.
///
/// Totals, categories and the monthly series always cover the full history;
/// only the listing honours the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub totals: Totals,
    pub categories: CategoryTotals,
    pub monthly: MonthlySeries,
    pub listing: Listing,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(transactions: &[Transaction]) -> Totals {
        compute_totals(transactions)
    }

    pub fn categories(transactions: &[Transaction]) -> CategoryTotals {
        category_totals(transactions)
    }

    pub fn monthly(transactions: &[Transaction], bucketing: MonthBucketing) -> MonthlySeries {
        monthly_series(transactions, bucketing)
    }

    /// Filters and sorts first, then slices the requested page and groups it by date.
    pub fn listing(
        transactions: &[Transaction],
        request: &ReportRequest,
        now: NaiveDateTime,
    ) -> Listing {
        let matched = filter_and_sort(transactions, &request.filter, now);
        let page = Paginator::new(request.page_size).page(&matched, request.page);
        debug!(
            matched = page.total_items,
            page = page.page,
            total_pages = page.total_pages,
            "built transaction listing"
        );
        Listing {
            groups: group_by_date(page.items),
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
        }
    }

    pub fn report(
        transactions: &[Transaction],
        request: &ReportRequest,
        now: NaiveDateTime,
    ) -> Report {
        Report {
            totals: Self::totals(transactions),
            categories: Self::categories(transactions),
            monthly: Self::monthly(transactions, request.bucketing),
            listing: Self::listing(transactions, request, now),
        }
    }

    /// The newest `count` transactions by `occurred_at`, for the dashboard.
    pub fn recent(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
        let mut newest = transactions.to_vec();
        newest.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        newest.truncate(count);
        newest
    }
}
