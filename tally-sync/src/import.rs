//! Batch import: parse, check and hand each accepted record to the provider.
//!
//! A batch never fails as a whole. Every line is either created or reported
//! with its reason, and re-importing a file creates duplicates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::{NewTransaction, Transaction, TransactionDraft, parse_iso_date};
use tally_ingest::{CsvDialect, CsvRow, read_csv};
use tracing::{info, warn};

use crate::provider::TransactionProvider;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
    /// Run full validation on every row before creating it.
    #[default]
    Validate,
    /// Accept whatever passed the codec's structural checks.
    TrustFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub mode: ImportMode,
    pub dialect: CsvDialect,
    /// Reference date for the "not in the future" rule
    pub today: NaiveDate,
}

impl ImportOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: ImportMode::default(),
            dialect: CsvDialect::default(),
            today,
        }
    }

    pub fn with_mode(mut self, mode: ImportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    /// Source line (CSV) or 1-based record index (JSON)
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: Vec<String>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn success_count(&self) -> usize {
        self.created.len()
    }

    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    /// True when nothing at all was found to import.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.failures.is_empty()
    }

    fn fail(&mut self, line: usize, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(line, reason = %reason, "import line rejected");
        self.failures.push(ImportFailure { line, reason });
    }
}

/// Import CSV text for `session`.
pub fn import_csv(
    provider: &dyn TransactionProvider,
    session: &Session,
    text: &str,
    options: ImportOptions,
) -> ImportReport {
    let parsed = read_csv(text, options.dialect);
    let mut report = ImportReport::default();

    for e in &parsed.errors {
        report.fail(e.line, e.kind.to_string());
    }

    for row in &parsed.rows {
        match accept_row(row, options) {
            Ok(txn) => store(provider, session, &mut report, row.line, txn),
            Err(reason) => report.fail(row.line, reason),
        }
    }
    report.failures.sort_by_key(|f| f.line);

    info!(
        user_id = %session.user_id,
        created = report.success_count(),
        failed = report.error_count(),
        "csv import finished"
    );
    report
}

/// Re-import records from a JSON backup. Ids and creation times in the file
/// are ignored; the provider assigns new ones.
pub fn import_records(
    provider: &dyn TransactionProvider,
    session: &Session,
    records: &[Transaction],
    options: ImportOptions,
) -> ImportReport {
    let mut report = ImportReport::default();

    for (i, record) in records.iter().enumerate() {
        let line = i + 1;
        let accepted = match options.mode {
            ImportMode::Validate => TransactionDraft::from_transaction(record)
                .validate(options.today)
                .map_err(|r| r.to_string()),
            ImportMode::TrustFile => Ok(NewTransaction {
                kind: record.kind.clone(),
                category: record.category.clone(),
                amount: record.amount,
                description: record.description.clone(),
                date: record.date,
            }),
        };
        match accepted {
            Ok(txn) => store(provider, session, &mut report, line, txn),
            Err(reason) => report.fail(line, reason),
        }
    }

    info!(
        user_id = %session.user_id,
        created = report.success_count(),
        failed = report.error_count(),
        "json import finished"
    );
    report
}

fn accept_row(row: &CsvRow, options: ImportOptions) -> Result<NewTransaction, String> {
    match options.mode {
        ImportMode::Validate => row.to_draft().validate(options.today).map_err(|r| r.to_string()),
        ImportMode::TrustFile => {
            let date = parse_iso_date(&row.date).ok_or_else(|| format!("invalid date '{}'", row.date))?;
            Ok(NewTransaction {
                kind: row.kind.clone(),
                category: row.category.clone(),
                amount: row.amount,
                description: row.description.clone(),
                date,
            })
        }
    }
}

fn store(
    provider: &dyn TransactionProvider,
    session: &Session,
    report: &mut ImportReport,
    line: usize,
    txn: NewTransaction,
) {
    match provider.create(session, txn) {
        Ok(id) => report.created.push(id),
        Err(e) => report.fail(line, e.to_string()),
    }
}
