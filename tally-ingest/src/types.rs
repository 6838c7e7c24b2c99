use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tally_core::{TransactionDraft, TransactionType};
use thiserror::Error;

/// Fixed column order for CSV interchange.
pub const CSV_HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

/// Quoting rules for CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    /// Quote a field only when it contains a comma; embedded quotes are not
    /// escaped. Files exported by earlier versions use this form.
    #[default]
    Lenient,
    /// RFC 4180 quoting with doubled embedded quotes.
    Rfc4180,
}

impl FromStr for CsvDialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(CsvDialect::Lenient),
            "rfc4180" | "strict" => Ok(CsvDialect::Rfc4180),
            other => Err(anyhow::anyhow!("unknown csv dialect: {other}")),
        }
    }
}

impl fmt::Display for CsvDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvDialect::Lenient => f.write_str("lenient"),
            CsvDialect::Rfc4180 => f.write_str("rfc4180"),
        }
    }
}

/// One accepted CSV data row.
///
/// Only structural checks have been applied; the date is kept as written so
/// that validation can report on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    /// 1-based line number in the source text
    pub line: usize,
    pub date: String,
    pub kind: TransactionType,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

impl CsvRow {
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft::new(
            self.kind.as_str(),
            self.amount.to_string(),
            self.category.clone(),
            self.description.clone(),
            self.date.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum RowErrorKind {
    #[error("missing required fields")]
    MissingFields,
    #[error("invalid type '{0}'")]
    InvalidType(String),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("unreadable record: {0}")]
    Malformed(String),
}

/// A skipped line and why.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("line {line}: {kind}")]
pub struct RowError {
    pub line: usize,
    pub kind: RowErrorKind,
}

/// Result of reading a CSV file: accepted rows plus skipped-line errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    pub rows: Vec<CsvRow>,
    pub errors: Vec<RowError>,
}

impl CsvImport {
    pub fn success_count(&self) -> usize {
        self.rows.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.errors.is_empty()
    }
}

/// Apply the per-row checks shared by both dialects.
///
/// `fields` are already unquoted and trimmed; missing trailing fields count as empty.
pub(crate) fn check_row(line: usize, fields: &[String]) -> Result<CsvRow, RowError> {
    let get = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");
    let (date, kind, category, amount, description) = (get(0), get(1), get(2), get(3), get(4));

    let fail = |kind: RowErrorKind| -> Result<CsvRow, RowError> { Err(RowError { line, kind }) };

    if date.is_empty() || kind.is_empty() || category.is_empty() || amount.is_empty() {
        return fail(RowErrorKind::MissingFields);
    }
    let Some(kind) = TransactionType::parse_strict(kind) else {
        return fail(RowErrorKind::InvalidType(kind.to_string()));
    };
    let amount = match amount.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return fail(RowErrorKind::InvalidAmount(amount.to_string())),
    };

    Ok(CsvRow {
        line,
        date: date.to_string(),
        kind,
        category: category.to_string(),
        amount,
        description: description.to_string(),
    })
}
