//! Record operations behind the subcommands.

use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::categories::is_recommended;
use tally_core::{NewTransaction, Transaction, TransactionDraft, TransactionFilter};
use tally_ingest::{CsvDialect, ExportFormat, export, export_filename, read_json};
use tally_sync::{
    Dashboard, DashboardView, ImportMode, ImportOptions, ImportReport, TransactionProvider, import_csv,
    import_records,
};
use tracing::{info, warn};

use crate::context::AppContext;

/// Fields given on the command line for `edit`; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub kind: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl DraftPatch {
    fn apply(self, draft: &mut TransactionDraft) {
        let Self {
            kind,
            amount,
            category,
            description,
            date,
        } = self;
        if let Some(v) = kind {
            draft.kind = v;
        }
        if let Some(v) = amount {
            draft.amount = v;
        }
        if let Some(v) = category {
            draft.category = v;
        }
        if let Some(v) = description {
            draft.description = v;
        }
        if let Some(v) = date {
            draft.date = v;
        }
    }
}

/// Note for categories outside the recommended list. They are still accepted.
pub fn category_hint(txn: &NewTransaction) -> Option<String> {
    if is_recommended(&txn.kind, &txn.category) {
        return None;
    }
    Some(format!(
        "'{}' is not a recommended {} category; see `tally categories`",
        txn.category, txn.kind
    ))
}

fn check_category(txn: &NewTransaction) {
    if let Some(hint) = category_hint(txn) {
        warn!("{hint}");
    }
}

/// Validate and store a new record; returns its id.
pub fn add(ctx: &AppContext, draft: &TransactionDraft) -> Result<String> {
    let txn = draft.validate(ctx.today()).map_err(|report| anyhow!("{report}"))?;
    check_category(&txn);
    let id = ctx.provider.create(&ctx.session, txn)?;
    Ok(id)
}

pub fn edit(ctx: &AppContext, id: &str, patch: DraftPatch) -> Result<()> {
    let existing = find(ctx, id)?;
    let mut draft = TransactionDraft::from_transaction(&existing);
    patch.apply(&mut draft);

    let txn = draft.validate(ctx.today()).map_err(|report| anyhow!("{report}"))?;
    check_category(&txn);
    ctx.provider.update(&ctx.session, id, txn)?;
    Ok(())
}

pub fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.provider.delete(&ctx.session, id)?;
    Ok(())
}

pub fn list(ctx: &AppContext, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let snapshot = ctx.provider.snapshot(&ctx.session)?;
    Ok(filter.apply(&snapshot))
}

/// Attach a dashboard for one delivery and return what it computed.
pub fn summary(ctx: &AppContext, filter: TransactionFilter, year: i32) -> DashboardView {
    Dashboard::attach(&ctx.provider, &ctx.session, filter, year).detach()
}

/// Write the current snapshot. Returns `None` when there was nothing to export.
pub fn export_to(
    ctx: &AppContext,
    format: ExportFormat,
    dialect: CsvDialect,
    out: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    let txns = ctx.provider.snapshot(&ctx.session)?;
    if txns.is_empty() {
        warn!("no transactions to export");
        return Ok(None);
    }

    let text = export(&txns, format, dialect)?;
    let path = out.unwrap_or_else(|| PathBuf::from(export_filename(format, ctx.today())));
    fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), records = txns.len(), "exported transactions");
    Ok(Some(path))
}

/// Import a `.json` backup or a CSV file.
pub fn import_from(ctx: &AppContext, path: &Path, mode: ImportMode, dialect: CsvDialect) -> Result<ImportReport> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let options = ImportOptions::new(ctx.today()).with_mode(mode).with_dialect(dialect);

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let records = read_json(&text).with_context(|| format!("parse {}", path.display()))?;
        return Ok(import_records(&ctx.provider, &ctx.session, &records, options));
    }

    let report = import_csv(&ctx.provider, &ctx.session, &text, options);
    if report.is_empty() {
        bail!("{} contains no transactions", path.display());
    }
    Ok(report)
}

fn find(ctx: &AppContext, id: &str) -> Result<Transaction> {
    ctx.provider
        .snapshot(&ctx.session)?
        .into_iter()
        .find(|t| t.id.as_deref() == Some(id))
        .with_context(|| format!("no transaction with id {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::Days;
    use tally_core::TransactionType;
    use tally_sync::LocalProvider;

    fn ctx() -> AppContext {
        AppContext::with_provider(Config::default(), chrono_tz::UTC, LocalProvider::in_memory(chrono_tz::UTC))
    }

    fn lunch(date: &str) -> TransactionDraft {
        TransactionDraft::new("expense", "12.50", "Food", "  Lunch  ", date)
    }

    #[test]
    fn test_add_then_list() {
        let ctx = ctx();
        let id = add(&ctx, &lunch("2024-01-05")).unwrap();

        let txns = list(&ctx, &TransactionFilter::default()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].id.as_deref(), Some(id.as_str()));
        assert_eq!(txns[0].description, "Lunch");
    }

    #[test]
    fn test_add_reports_first_validation_error() {
        let ctx = ctx();
        let tomorrow = ctx.today().checked_add_days(Days::new(1)).unwrap();
        let draft = TransactionDraft::new("expense", "-3", "Food", "x", tomorrow.format("%Y-%m-%d").to_string());

        let err = add(&ctx, &draft).unwrap_err();
        assert_eq!(err.to_string(), "Amount must be a positive number");
        assert!(list(&ctx, &TransactionFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_category_hint_for_unlisted_category() {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let listed = lunch("2024-01-05").validate(today).unwrap();
        assert_eq!(category_hint(&listed), None);

        let odd = TransactionDraft::new("income", "5", "Food", "Sold lunch", "2024-01-05")
            .validate(today)
            .unwrap();
        let hint = category_hint(&odd).unwrap();
        assert!(hint.contains("'Food' is not a recommended income category"));
    }

    #[test]
    fn test_edit_patches_fields() {
        let ctx = ctx();
        let id = add(&ctx, &lunch("2024-01-05")).unwrap();
        let patch = DraftPatch {
            kind: Some("income".into()),
            category: Some("Refund".into()),
            ..DraftPatch::default()
        };
        edit(&ctx, &id, patch).unwrap();

        let txn = find(&ctx, &id).unwrap();
        assert_eq!(txn.kind, TransactionType::Income);
        assert_eq!(txn.category, "Refund");
        assert_eq!(txn.amount, 12.5);

        assert!(edit(&ctx, "txn-999999", DraftPatch::default()).is_err());
    }

    #[test]
    fn test_export_and_reimport() {
        let ctx = ctx();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("backup.csv");

        let nothing = export_to(&ctx, ExportFormat::Csv, CsvDialect::Lenient, Some(out.clone())).unwrap();
        assert!(nothing.is_none());
        assert!(!out.exists());

        add(&ctx, &lunch("2024-01-05")).unwrap();
        add(&ctx, &TransactionDraft::new("income", "1000", "Salary", "Pay, January", "2024-01-01")).unwrap();
        export_to(&ctx, ExportFormat::Csv, CsvDialect::Lenient, Some(out.clone())).unwrap();

        let report = import_from(&ctx, &out, ImportMode::Validate, CsvDialect::Lenient).unwrap();
        assert_eq!(report.success_count(), 2);
        let view = summary(&ctx, TransactionFilter::default(), 2024);
        assert_eq!(view.summary.count, 4);
        assert_eq!(view.summary.net, 2.0 * (1000.0 - 12.5));
    }

    #[test]
    fn test_json_backup_import() {
        let ctx = ctx();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("backup.json");

        add(&ctx, &lunch("2024-01-05")).unwrap();
        export_to(&ctx, ExportFormat::Json, CsvDialect::Lenient, Some(out.clone())).unwrap();
        delete(&ctx, "txn-000001").unwrap();

        let report = import_from(&ctx, &out, ImportMode::Validate, CsvDialect::Lenient).unwrap();
        assert_eq!(report.success_count(), 1);
        assert_eq!(list(&ctx, &TransactionFilter::default()).unwrap()[0].id.as_deref(), Some("txn-000002"));
    }
}
