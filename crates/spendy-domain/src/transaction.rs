//! Domain models for recorded transactions and their creation inputs.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    category::{Category, TransactionKind},
    common::{OwnerId, TransactionId},
    money::{AmountError, Cents},
};

/// A single recorded income or expense event.
///
/// Transactions are append-only: once the store assigns an id the record never changes.
/// Deserialized records are checked against the same rules as [`NewTransaction::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord")]
pub struct Transaction {
    pub id: TransactionId,
    pub owner_id: OwnerId,
    pub kind: TransactionKind,
    pub category: Category,
    #[serde(rename = "amount_cents")]
    pub amount: Cents,
    pub description: String,
    pub occurred_at: NaiveDateTime,
}

/// Stored shape of a transaction before validation.
#[derive(Deserialize)]
struct TransactionRecord {
    id: TransactionId,
    owner_id: OwnerId,
    kind: TransactionKind,
    category: Category,
    amount_cents: Cents,
    description: String,
    #[serde(deserialize_with = "deserialize_occurred_at")]
    occurred_at: NaiveDateTime,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = TransactionError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let fields = NewTransaction::new(
            record.kind,
            record.category,
            record.amount_cents,
            record.description,
            record.occurred_at,
        )?;
        Ok(Transaction::from_new(record.id, record.owner_id, fields))
    }
}

impl Transaction {
    /// Materialises a stored record from validated fields.
    pub fn from_new(id: TransactionId, owner_id: OwnerId, fields: NewTransaction) -> Self {
        Self {
            id,
            owner_id,
            kind: fields.kind,
            category: fields.category,
            amount: fields.amount,
            description: fields.description,
            occurred_at: fields.occurred_at,
        }
    }

    /// Calendar date the user chose, exactly as entered.
    pub fn date(&self) -> NaiveDate {
        self.occurred_at.date()
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the direction applied: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Validated fields for a transaction that has not been stored yet.
///
/// Only [`NewTransaction::new`] and [`TransactionDraft::parse`] build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    kind: TransactionKind,
    category: Category,
    amount: Cents,
    description: String,
    occurred_at: NaiveDateTime,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        category: Category,
        amount: Cents,
        description: impl Into<String>,
        occurred_at: NaiveDateTime,
    ) -> Result<Self, TransactionError> {
        if category.kind() != kind {
            return Err(TransactionError::CategoryMismatch { category, kind });
        }
        if amount.is_negative() {
            return Err(TransactionError::Amount(AmountError::Negative(
                amount.to_string(),
            )));
        }
        if !amount.is_valid_amount() {
            return Err(TransactionError::Amount(AmountError::Overflow(
                amount.to_string(),
            )));
        }
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(TransactionError::EmptyDescription);
        }
        Ok(Self {
            kind,
            category,
            amount,
            description,
            occurred_at,
        })
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> Cents {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn occurred_at(&self) -> NaiveDateTime {
        self.occurred_at
    }
}

/// Raw text fields as typed into an entry form, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub date: String,
}

impl TransactionDraft {
    /// Coerces the draft into validated fields.
    pub fn parse(&self) -> Result<NewTransaction, TransactionError> {
        let kind = TransactionKind::from_label(&self.kind)
            .ok_or_else(|| TransactionError::UnknownKind(self.kind.clone()))?;
        let category = Category::from_label(&self.category)
            .ok_or_else(|| TransactionError::UnknownCategory(self.category.clone()))?;
        let amount = Cents::parse_amount(&self.amount).map_err(TransactionError::Amount)?;
        let occurred_at = parse_occurred_at(&self.date)
            .ok_or_else(|| TransactionError::InvalidDate(self.date.clone()))?;
        NewTransaction::new(kind, category, amount, self.description.as_str(), occurred_at)
    }
}

/// Reasons a transaction cannot be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    UnknownKind(String),
    UnknownCategory(String),
    CategoryMismatch {
        category: Category,
        kind: TransactionKind,
    },
    Amount(AmountError),
    EmptyDescription,
    InvalidDate(String),
}

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionError::UnknownKind(raw) => {
                write!(f, "unknown transaction type `{raw}` (expected income or expense)")
            }
            TransactionError::UnknownCategory(raw) => write!(f, "unknown category `{raw}`"),
            TransactionError::CategoryMismatch { category, kind } => {
                write!(f, "category {category} cannot be used for {} transactions", kind.as_str())
            }
            TransactionError::Amount(err) => write!(f, "{err}"),
            TransactionError::EmptyDescription => f.write_str("description is required"),
            TransactionError::InvalidDate(raw) => write!(f, "invalid date `{raw}`"),
        }
    }
}

impl std::error::Error for TransactionError {}

/// Parses a user-chosen timestamp without normalising its timezone.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]`, `YYYY-MM-DD HH:MM:SS`
/// and RFC 3339 with an offset; for the latter the written local wall time is kept.
pub fn parse_occurred_at(value: &str) -> Option<NaiveDateTime> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_local());
    }
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
    for format in FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(stamp);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn deserialize_occurred_at<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_occurred_at(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid occurred_at `{raw}`")))
}
