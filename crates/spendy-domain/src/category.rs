//! Transaction direction and the fixed category sets attached to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a transaction. The amount itself is always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Returns the categories that may be used with this kind.
    pub fn categories(self) -> &'static [Category] {
        match self {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Categorises transactions for reporting.
///
/// Income and expense categories are disjoint; [`Category::kind`] tells which set
/// a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Salary,
    Freelance,
    Investments,
    Business,
    #[serde(rename = "Other Income")]
    OtherIncome,
    Food,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Healthcare,
    Shopping,
    Other,
}

pub const INCOME_CATEGORIES: [Category; 5] = [
    Category::Salary,
    Category::Freelance,
    Category::Investments,
    Category::Business,
    Category::OtherIncome,
];

pub const EXPENSE_CATEGORIES: [Category; 8] = [
    Category::Food,
    Category::Transportation,
    Category::Housing,
    Category::Utilities,
    Category::Entertainment,
    Category::Healthcare,
    Category::Shopping,
    Category::Other,
];

impl Category {
    pub fn kind(self) -> TransactionKind {
        match self {
            Category::Salary
            | Category::Freelance
            | Category::Investments
            | Category::Business
            | Category::OtherIncome => TransactionKind::Income,
            Category::Food
            | Category::Transportation
            | Category::Housing
            | Category::Utilities
            | Category::Entertainment
            | Category::Healthcare
            | Category::Shopping
            | Category::Other => TransactionKind::Expense,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investments => "Investments",
            Category::Business => "Business",
            Category::OtherIncome => "Other Income",
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    /// Looks a category up by label, ignoring case, spaces, dashes and underscores.
    pub fn from_label(value: &str) -> Option<Self> {
        let wanted = normalize(value);
        if wanted.is_empty() {
            return None;
        }
        INCOME_CATEGORIES
            .iter()
            .chain(EXPENSE_CATEGORIES.iter())
            .copied()
            .find(|category| normalize(category.label()) == wanted)
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
