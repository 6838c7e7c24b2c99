//! Transaction record types shared by every layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a transaction.
///
/// Stored data is not trusted: any type string other than `income` or
/// `expense` deserializes to `Unrecognized` and contributes nothing to
/// aggregations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Income,
    Expense,
    Unrecognized(String),
}

impl TransactionType {
    /// Parse one of the two accepted type names, exactly as written.
    pub fn parse_strict(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Unrecognized(raw) => raw,
        }
    }

    /// Display label ("Income" / "Expense").
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, TransactionType::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, TransactionType::Expense)
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        TransactionType::parse_strict(&s).unwrap_or(TransactionType::Unrecognized(s))
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One income or expense entry, as held by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Provider-assigned identifier; `None` until first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    /// Always positive; direction lives in `kind`
    pub amount: f64,
    pub description: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Server-assigned creation instant, audit only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        category: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            kind,
            category: category.into(),
            amount,
            description: description.into(),
            date,
            created_at: None,
        }
    }

    pub fn income(category: impl Into<String>, amount: f64, description: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, category, amount, description, date)
    }

    pub fn expense(category: impl Into<String>, amount: f64, description: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, category, amount, description, date)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Amount as it counts toward totals.
    ///
    /// Non-finite or non-positive amounts (malformed stored data) count as 0.
    pub fn contribution(&self) -> f64 {
        if self.amount.is_finite() && self.amount > 0.0 {
            self.amount
        } else {
            0.0
        }
    }

    /// Amount with sign applied: positive for income, negative for expense.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.contribution(),
            TransactionType::Expense => -self.contribution(),
            TransactionType::Unrecognized(_) => 0.0,
        }
    }
}

/// A validated record ready to hand to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
}

/// Raw candidate input, one string per field, as typed by a user or read from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: String,
}

impl TransactionDraft {
    pub fn new(
        kind: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            amount: amount.into(),
            category: category.into(),
            description: description.into(),
            date: date.into(),
        }
    }

    /// Pre-fill a draft from an existing record (edit flow).
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            kind: txn.kind.as_str().to_string(),
            amount: txn.amount.to_string(),
            category: txn.category.clone(),
            description: txn.description.clone(),
            date: txn.date.format("%Y-%m-%d").to_string(),
        }
    }
}
