//! Strict CSV dialect backed by the `csv` crate.
//!
//! Opt-in only: files written here double embedded quotes, which the lenient
//! reader does not undo.

use anyhow::{Context, Result};
use tally_core::Transaction;
use tracing::warn;

use crate::types::{CSV_HEADER, CsvImport, RowError, RowErrorKind, check_row};

pub fn write(txns: &[Transaction]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for t in txns {
        wtr.write_record([
            t.date.format("%Y-%m-%d").to_string(),
            t.kind.as_str().to_string(),
            t.category.clone(),
            t.amount.to_string(),
            t.description.clone(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv writer: {}", e.error()))?;
    let mut text = String::from_utf8(bytes).context("csv output is not utf-8")?;
    // Match the lenient writer: no trailing newline.
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub fn read(text: &str) -> CsvImport {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut out = CsvImport::default();

    for result in rdr.records() {
        let outcome = match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
                let fields: Vec<String> = record.iter().map(str::to_string).collect();
                check_row(line, &fields)
            }
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                Err(RowError {
                    line,
                    kind: RowErrorKind::Malformed(e.to_string()),
                })
            }
        };

        match outcome {
            Ok(row) => out.rows.push(row),
            Err(e) => {
                warn!(line = e.line, reason = %e.kind, "skipping csv record");
                out.errors.push(e);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_quotes_are_escaped_and_restored() {
        let txns = vec![
            Transaction::expense("Gifts", 20.0, "a \"nice\", mug", d(2024, 1, 2)),
            Transaction::income("Salary", 1000.0, "Paycheck", d(2024, 1, 1)),
        ];
        let text = write(&txns).unwrap();
        assert!(text.contains("\"a \"\"nice\"\", mug\""));
        assert!(!text.ends_with('\n'));

        let import = read(&text);
        assert_eq!(import.error_count(), 0);
        assert_eq!(import.rows[0].description, "a \"nice\", mug");
        assert_eq!(import.rows[1].amount, 1000.0);
    }

    #[test]
    fn test_bad_rows_are_counted() {
        let text = "Date,Type,Category,Amount,Description\n\
                    2024-01-01,income,Salary,1000,Paycheck\n\
                    2024-01-02,maybe,Food,10,Snack\n";
        let import = read(text);
        assert_eq!(import.success_count(), 1);
        assert_eq!(import.error_count(), 1);
        assert_eq!(import.errors[0].line, 3);
    }
}
