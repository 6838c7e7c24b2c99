//! tally-ingest: CSV and JSON interchange for transaction backups.

pub mod csv_codec;
pub mod json;
pub mod rfc4180;
pub mod types;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::Transaction;

pub use json::{read_json, write_json};
pub use types::{CSV_HEADER, CsvDialect, CsvImport, CsvRow, RowError, RowErrorKind};

/// Serialize `txns` in the given dialect.
pub fn write_csv(txns: &[Transaction], dialect: CsvDialect) -> Result<String> {
    match dialect {
        CsvDialect::Lenient => Ok(csv_codec::write_lenient(txns)),
        CsvDialect::Rfc4180 => rfc4180::write(txns),
    }
}

/// Parse CSV text in the given dialect. Never fails; bad lines land in `errors`.
pub fn read_csv(text: &str, dialect: CsvDialect) -> CsvImport {
    match dialect {
        CsvDialect::Lenient => csv_codec::read_lenient(text),
        CsvDialect::Rfc4180 => rfc4180::read(text),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Default download name, e.g. `tally-2024-01-31.csv`.
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("tally-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Render `txns` in `format`.
pub fn export(txns: &[Transaction], format: ExportFormat, dialect: CsvDialect) -> Result<String> {
    match format {
        ExportFormat::Csv => write_csv(txns, dialect),
        ExportFormat::Json => write_json(txns),
    }
}
