//! Field checks applied to candidate transactions before they are persisted.
//!
//! Every field is checked independently so a caller can show all problems at
//! once; `first_error` picks the one to surface when only a single message fits.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::model::{NewTransaction, TransactionDraft, TransactionType};
use crate::time::parse_iso_date;

/// Longest description accepted, in characters after trimming.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Candidate fields, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Type,
    Amount,
    Category,
    Description,
    Date,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::Amount => "amount",
            Field::Category => "category",
            Field::Description => "description",
            Field::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum FieldError {
    #[error("Please select a valid transaction type")]
    InvalidType,
    #[error("Amount is required")]
    AmountRequired,
    #[error("Amount must be a positive number")]
    AmountNotPositive,
    #[error("Please select a category")]
    CategoryRequired,
    #[error("Description is required")]
    DescriptionRequired,
    #[error("Description must be less than 200 characters")]
    DescriptionTooLong,
    #[error("Date is required")]
    DateRequired,
    #[error("Invalid date format")]
    InvalidDate,
    #[error("Date cannot be in the future")]
    FutureDate,
}

/// Outcome of validating one draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: BTreeMap<Field, FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Highest-priority violation, if any.
    pub fn first_error(&self) -> Option<(Field, FieldError)> {
        self.errors.iter().next().map(|(f, e)| (*f, *e))
    }

    pub fn error_for(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_error() {
            Some((_, err)) => write!(f, "{err}"),
            None => f.write_str("valid"),
        }
    }
}

impl std::error::Error for ValidationReport {}

/// Check every field of `draft`. Dates after `today` are rejected.
pub fn validate_transaction(draft: &TransactionDraft, today: NaiveDate) -> ValidationReport {
    let mut errors = BTreeMap::new();

    if check_type(&draft.kind).is_none() {
        errors.insert(Field::Type, FieldError::InvalidType);
    }
    if let Err(e) = check_amount(&draft.amount) {
        errors.insert(Field::Amount, e);
    }
    if draft.category.trim().is_empty() {
        errors.insert(Field::Category, FieldError::CategoryRequired);
    }
    if let Err(e) = check_description(&draft.description) {
        errors.insert(Field::Description, e);
    }
    if let Err(e) = check_date(&draft.date, today) {
        errors.insert(Field::Date, e);
    }

    ValidationReport { errors }
}

fn check_type(kind: &str) -> Option<TransactionType> {
    TransactionType::parse_strict(kind)
}

fn check_amount(raw: &str) -> Result<f64, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::AmountRequired);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(FieldError::AmountNotPositive),
    }
}

fn check_description(raw: &str) -> Result<(), FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FieldError::DescriptionRequired)
    } else if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        Err(FieldError::DescriptionTooLong)
    } else {
        Ok(())
    }
}

fn check_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::DateRequired);
    }
    let date = parse_iso_date(raw).ok_or(FieldError::InvalidDate)?;
    if date > today {
        return Err(FieldError::FutureDate);
    }
    Ok(date)
}

impl TransactionDraft {
    /// Validate and convert into a typed record with trimmed text fields.
    pub fn validate(&self, today: NaiveDate) -> Result<NewTransaction, ValidationReport> {
        let report = validate_transaction(self, today);
        if !report.is_valid() {
            return Err(report);
        }

        match (
            check_type(&self.kind),
            check_amount(&self.amount),
            check_date(&self.date, today),
        ) {
            (Some(kind), Ok(amount), Ok(date)) => Ok(NewTransaction {
                kind,
                category: self.category.trim().to_string(),
                amount,
                description: self.description.trim().to_string(),
                date,
            }),
            _ => Err(report),
        }
    }
}
