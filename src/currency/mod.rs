//! Money and date rendering for the reporting shell.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use spendy_domain::Cents;

/// Separators used when printing amounts for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl NumberStyle {
    /// Picks separators from the language part of a BCP 47 tag such as `de-DE`.
    pub fn for_locale(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "da" | "tr" | "id" => Self {
                decimal_separator: ',',
                grouping_separator: '.',
            },
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" | "ru" => Self {
                decimal_separator: ',',
                grouping_separator: ' ',
            },
            _ => Self::default(),
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "BRL" => "R$".into(),
        "INR" => "₹".into(),
        _ => code.into(),
    }
}

/// Formats an amount with its currency symbol, e.g. `$1,234.50` or `-$12.00`.
pub fn format_cents(amount: Cents, currency: &str, locale: &str) -> String {
    let style = NumberStyle::for_locale(locale);
    let value = amount.value();
    let magnitude = value.unsigned_abs();
    let whole = group_digits(&(magnitude / 100).to_string(), style.grouping_separator);
    let body = format!("{}{}{:02}", whole, style.decimal_separator, magnitude % 100);
    let symbol = symbol_for(currency);
    let sign = if value < 0 { "-" } else { "" };
    if symbol.chars().count() > 2 {
        format!("{sign}{symbol} {body}")
    } else {
        format!("{sign}{symbol}{body}")
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Long US-style date used for day headings: `January 5, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date.month()), date.day(), date.year())
}

/// Short date and time used in listings: `Jan 5, 2024 09:30`.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}
