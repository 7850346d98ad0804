//! Plain-text tables for reports. No colors; styling is left to `output`.

use spendy_core::{CategoryTotals, Listing, MonthlySeries, Totals};
use spendy_domain::{Cents, Transaction};

use crate::currency::{format_cents, format_date, format_percent, format_timestamp};

const COLUMN_GAP: &str = "  ";

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.into(),
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            header: header.into(),
            max_width: None,
            alignment: Alignment::Right,
        }
    }

    pub fn capped(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub show_headers: bool,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            show_headers: true,
        }
    }

    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width per column from headers, rows and caps.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = if self.show_headers {
                    column.header.chars().count()
                } else {
                    0
                };
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                match column.max_width {
                    Some(max_width) => width.min(max_width),
                    None => width,
                }
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment)
            })
            .collect();
        cells.join(COLUMN_GAP).trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        if self.show_headers {
            let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
            lines.push(self.render_row(&header, &widths));
            lines.push(horizontal_rule(&widths));
        }
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(fitted.chars().count());
    match alignment {
        Alignment::Left => format!("{}{}", fitted, " ".repeat(remaining)),
        Alignment::Right => format!("{}{}", " ".repeat(remaining), fitted),
    }
}

fn truncate_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut kept: String = text.chars().take(width - 1).collect();
    kept.push('…');
    kept
}

pub fn horizontal_rule(widths: &[usize]) -> String {
    let total: usize =
        widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);
    "-".repeat(total)
}

/// Currency and locale used for every amount in a rendering.
#[derive(Debug, Clone)]
pub struct MoneyFormat {
    pub currency: String,
    pub locale: String,
}

impl MoneyFormat {
    pub fn new(currency: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            locale: locale.into(),
        }
    }

    pub fn amount(&self, amount: Cents) -> String {
        format_cents(amount, &self.currency, &self.locale)
    }

    /// `+$10.00` for income and `-$10.00` for expenses.
    pub fn signed(&self, txn: &Transaction) -> String {
        let sign = if txn.is_expense() { '-' } else { '+' };
        format!("{}{}", sign, self.amount(txn.amount))
    }
}

pub fn render_totals(totals: &Totals, money: &MoneyFormat) -> String {
    let mut table =
        Table::new(vec![TableColumn::left(""), TableColumn::right("")]).without_headers();
    table.push(vec!["Income".into(), money.amount(totals.total_income)]);
    table.push(vec!["Expenses".into(), money.amount(totals.total_expenses)]);
    table.push(vec!["Balance".into(), money.amount(totals.balance)]);
    table.render()
}

pub fn render_categories(categories: &CategoryTotals, money: &MoneyFormat) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
    ]);
    let rows = categories.labels().into_iter().zip(categories.iter());
    for ((label, entry), (_, share)) in rows.zip(categories.shares()) {
        table.push(vec![
            label.to_string(),
            money.amount(entry.amount),
            format_percent(share),
        ]);
    }
    table.render()
}

pub fn render_monthly(series: &MonthlySeries, money: &MoneyFormat) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Expenses"),
        TableColumn::right("Savings"),
        TableColumn::right("Rate"),
    ]);
    for (label, (_, totals)) in series.labels().into_iter().zip(series.iter()) {
        table.push(vec![
            label,
            money.amount(totals.income),
            money.amount(totals.expenses),
            money.amount(totals.savings),
            format_percent(totals.savings_rate),
        ]);
    }
    table.render()
}

fn transaction_columns() -> Vec<TableColumn> {
    vec![
        TableColumn::left("Time"),
        TableColumn::left("Category"),
        TableColumn::left("Description").capped(32),
        TableColumn::right("Amount"),
    ]
}

fn transaction_row(txn: &Transaction, money: &MoneyFormat) -> Vec<String> {
    vec![
        txn.occurred_at.format("%H:%M").to_string(),
        txn.category.label().to_string(),
        txn.description.clone(),
        money.signed(txn),
    ]
}

/// Day headings followed by that day's rows, aligned across the whole page.
pub fn render_listing(listing: &Listing, money: &MoneyFormat) -> String {
    let mut table = Table::new(transaction_columns()).without_headers();
    for group in &listing.groups {
        for txn in &group.transactions {
            table.push(transaction_row(txn, money));
        }
    }
    let widths = table.compute_widths();

    let mut lines = Vec::new();
    let mut rows = table.rows.iter();
    for group in &listing.groups {
        lines.push(format!(
            "{} (net {})",
            format_date(group.date),
            money.amount(group.net())
        ));
        for row in rows.by_ref().take(group.transactions.len()) {
            lines.push(table.render_row(row, &widths));
        }
    }
    let noun = if listing.total_items == 1 {
        "transaction"
    } else {
        "transactions"
    };
    lines.push(format!(
        "Page {} of {} ({} {})",
        listing.page,
        listing.total_pages.max(1),
        listing.total_items,
        noun
    ));
    let mut nav = Vec::new();
    if listing.has_previous {
        nav.push(format!("previous: --page {}", listing.page - 1));
    }
    if listing.has_next {
        nav.push(format!("next: --page {}", listing.page + 1));
    }
    if !nav.is_empty() {
        lines.push(nav.join("  "));
    }
    lines.join("\n")
}

pub fn render_recent(transactions: &[Transaction], money: &MoneyFormat) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("When"),
        TableColumn::left("Category"),
        TableColumn::left("Description").capped(32),
        TableColumn::right("Amount"),
    ]);
    for txn in transactions {
        table.push(vec![
            format_timestamp(txn.occurred_at),
            txn.category.label().to_string(),
            txn.description.clone(),
            money.signed(txn),
        ]);
    }
    table.render()
}
