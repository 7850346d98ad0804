use std::time::Duration;

use chrono::NaiveDate;
use spendy_domain::{Category, Cents, OwnerId, TransactionDraft, TransactionKind};

use crate::{
    aggregation::{category_totals, compute_totals, group_by_date},
    monthly::{monthly_series, MonthBucketing},
    filter::{filter_and_sort, DateRange, SortBy, SortOrder, TransactionFilter},
    memory_store::MemoryStore,
    session::{LocalSession, Session, SessionProvider},
    summary_service::{ReportRequest, SummaryService},
    transaction_service::{RetryPolicy, TransactionService},
    CoreError,
};

use support::{at, txn, txn_described};

pub(crate) mod support {
    use chrono::NaiveDateTime;
    use spendy_domain::{
        parse_occurred_at, Category, Cents, NewTransaction, OwnerId, Transaction, TransactionId,
        TransactionKind,
    };

    pub(crate) fn at(value: &str) -> NaiveDateTime {
        parse_occurred_at(value).expect("valid test timestamp")
    }

    pub(crate) fn txn(kind: TransactionKind, category: Category, cents: i64, date: &str) -> Transaction {
        txn_described(kind, category, cents, date, category.label())
    }

    pub(crate) fn txn_described(
        kind: TransactionKind,
        category: Category,
        cents: i64,
        date: &str,
        description: &str,
    ) -> Transaction {
        let fields = NewTransaction::new(kind, category, Cents::new(cents), description, at(date))
            .expect("valid test transaction");
        Transaction::from_new(TransactionId::new(), OwnerId::new("user-1"), fields)
    }
}

fn salary_and_food() -> Vec<spendy_domain::Transaction> {
    vec![
        txn(TransactionKind::Income, Category::Salary, 100_000, "2024-01-05"),
        txn(TransactionKind::Expense, Category::Food, 30_000, "2024-01-05"),
        txn(TransactionKind::Expense, Category::Food, 20_000, "2024-02-01"),
    ]
}

#[test]
fn january_salary_and_food_aggregate_and_group() {
    let transactions = salary_and_food();

    let totals = compute_totals(&transactions);
    assert_eq!(totals.total_income, Cents::from_major(1000));
    assert_eq!(totals.total_expenses, Cents::from_major(500));
    assert_eq!(totals.balance, Cents::from_major(500));

    let categories = category_totals(&transactions);
    assert_eq!(categories.len(), 1);
    assert_eq!(categories.get(Category::Food), Some(Cents::from_major(500)));

    let groups = group_by_date(&transactions);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(groups[0].transactions.len(), 1);
    assert_eq!(groups[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(groups[1].transactions.len(), 2);
}

#[test]
fn aggregates_do_not_mutate_and_are_repeatable() {
    let transactions = salary_and_food();
    let before = transactions.clone();

    assert_eq!(compute_totals(&transactions), compute_totals(&transactions));
    assert_eq!(category_totals(&transactions), category_totals(&transactions));
    assert_eq!(group_by_date(&transactions), group_by_date(&transactions));
    assert_eq!(transactions, before);
}

#[test]
fn identity_filter_is_a_permutation() {
    let transactions = salary_and_food();
    let filter = TransactionFilter::default();
    let listed = filter_and_sort(&transactions, &filter, at("2024-06-01"));

    assert_eq!(listed.len(), transactions.len());
    for txn in &transactions {
        assert!(listed.iter().any(|other| other.id == txn.id));
    }
}

#[test]
fn sorting_by_amount_keeps_ties_in_input_order() {
    let transactions = vec![
        txn_described(TransactionKind::Expense, Category::Food, 500, "2024-03-01", "first"),
        txn_described(TransactionKind::Expense, Category::Shopping, 900, "2024-03-02", "big"),
        txn_described(TransactionKind::Expense, Category::Other, 500, "2024-03-03", "second"),
    ];
    let filter = TransactionFilter {
        sort_by: SortBy::Amount,
        sort_order: SortOrder::Asc,
        ..TransactionFilter::default()
    };
    let listed = filter_and_sort(&transactions, &filter, at("2024-06-01"));
    let descriptions: Vec<&str> = listed.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["first", "second", "big"]);

    let filter = TransactionFilter {
        sort_order: SortOrder::Desc,
        ..filter
    };
    let listed = filter_and_sort(&transactions, &filter, at("2024-06-01"));
    let descriptions: Vec<&str> = listed.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["big", "first", "second"]);
}

#[test]
fn report_filters_before_paginating() {
    let mut transactions = Vec::new();
    for day in 1..=12 {
        transactions.push(txn_described(
            TransactionKind::Expense,
            Category::Food,
            100 * day,
            &format!("2024-05-{day:02}"),
            "lunch",
        ));
    }
    transactions.push(txn_described(
        TransactionKind::Expense,
        Category::Housing,
        90_000,
        "2024-05-01",
        "rent",
    ));

    let request = ReportRequest {
        filter: TransactionFilter {
            search_query: "RENT".into(),
            ..TransactionFilter::default()
        },
        page: 2,
        ..ReportRequest::default()
    };
    let report = SummaryService::report(&transactions, &request, at("2024-05-20"));

    assert_eq!(report.listing.total_items, 1);
    assert_eq!(report.listing.total_pages, 1);
    assert_eq!(report.listing.page, 1);
    assert_eq!(report.listing.groups.len(), 1);
    assert_eq!(report.listing.groups[0].transactions[0].description, "rent");
    assert_eq!(report.totals.total_expenses, Cents::new(90_000 + 7_800));
    assert_eq!(report.categories.len(), 2);
}

#[test]
fn report_listing_pages_are_grouped_by_date() {
    let transactions: Vec<_> = (1..=15)
        .map(|day| {
            txn(
                TransactionKind::Expense,
                Category::Transportation,
                250,
                &format!("2024-04-{day:02}"),
            )
        })
        .collect();
    let request = ReportRequest {
        filter: TransactionFilter {
            date_range: DateRange::All,
            ..TransactionFilter::default()
        },
        page: 2,
        page_size: 10,
        ..ReportRequest::default()
    };
    let listing = SummaryService::listing(&transactions, &request, at("2024-04-30"));

    assert_eq!(listing.total_pages, 2);
    assert_eq!(listing.groups.len(), 5);
    assert_eq!(listing.groups[0].date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
    assert!(listing.has_previous);
    assert!(!listing.has_next);
}

#[test]
fn recent_returns_newest_first() {
    let transactions = salary_and_food();
    let recent = SummaryService::recent(&transactions, 2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert!(SummaryService::recent(&transactions, 0).is_empty());
}

#[test]
fn huge_histories_saturate_instead_of_panicking() {
    let largest = Cents::MAX_AMOUNT.value();
    let mut transactions: Vec<_> = (0..10_000)
        .map(|_| txn(TransactionKind::Expense, Category::Housing, largest, "2024-03-01"))
        .collect();
    transactions.push(txn(TransactionKind::Income, Category::Salary, largest, "2024-03-01"));

    let totals = compute_totals(&transactions);
    assert_eq!(totals.total_expenses, Cents::new(i64::MAX));
    assert_eq!(totals.total_income, Cents::MAX_AMOUNT);
    assert!(totals.balance.is_negative());

    let categories = category_totals(&transactions);
    assert_eq!(categories.get(Category::Housing), Some(Cents::new(i64::MAX)));

    let groups = group_by_date(&transactions);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].net().is_negative());

    let series = monthly_series(&transactions, MonthBucketing::YearMonth);
    let (_, march) = series.iter().next().expect("march bucket");
    assert_eq!(march.expenses, Cents::new(i64::MAX));
}

#[test]
fn signed_out_provider_cannot_load() {
    let provider = LocalSession::new();
    let err = Session::from_provider(&provider).unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
    assert!(!err.is_retryable());
}

#[test]
fn login_add_load_and_report_round_trip() {
    let store = MemoryStore::new();
    let mut provider = LocalSession::new();
    provider.login(OwnerId::new("dana"));
    let session = Session::from_provider(&provider).expect("signed in");

    for (kind, category, amount, date) in [
        ("income", "salary", "1000", "2024-01-05"),
        ("expense", "food", "300", "2024-01-05"),
        ("expense", "Food", "200.00", "2024-02-01"),
    ] {
        let draft = TransactionDraft {
            kind: kind.into(),
            category: category.into(),
            amount: amount.into(),
            description: format!("{category} entry"),
            date: date.into(),
        };
        TransactionService::add(&store, &session, &draft).expect("add transaction");
    }
    store.simulate_index_build(1);

    let loaded = TransactionService::load(
        &store,
        &session,
        RetryPolicy::new(2, Duration::from_millis(1)),
    )
    .expect("load after index build");
    assert_eq!(loaded[0].date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

    let report = SummaryService::report(&loaded, &ReportRequest::default(), at("2024-02-10"));
    assert_eq!(report.totals.balance, Cents::from_major(500));
    assert_eq!(report.monthly.len(), 2);
    assert_eq!(report.listing.total_items, 3);
}
