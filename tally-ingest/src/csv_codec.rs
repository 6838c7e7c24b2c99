//! Lenient CSV writer/reader for backup and restore.
//!
//! Writer: header `Date,Type,Category,Amount,Description`, one line per record.
//! A field is quoted only when it contains a comma and embedded quotes are
//! written as-is, so this is not RFC 4180. See [`crate::rfc4180`] for that.
//!
//! Reader: blank lines are dropped, the first remaining line is taken as the
//! header, and each data line is checked on its own. Bad lines are skipped and
//! reported; they never abort the batch.

use tally_core::Transaction;
use tracing::warn;

use crate::types::{CSV_HEADER, CsvImport, check_row};

/// Serialize `txns` in input order.
pub fn write_lenient(txns: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(txns.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for t in txns {
        let date = t.date.format("%Y-%m-%d").to_string();
        let amount = t.amount.to_string();
        let cells = [
            date.as_str(),
            t.kind.as_str(),
            t.category.as_str(),
            amount.as_str(),
            t.description.as_str(),
        ];
        let row: Vec<String> = cells.iter().map(|c| quote_if_needed(c)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn quote_if_needed(cell: &str) -> String {
    if cell.contains(',') {
        format!("\"{cell}\"")
    } else {
        cell.to_string()
    }
}

/// Parse text produced by [`write_lenient`] or a hand-edited equivalent.
pub fn read_lenient(text: &str) -> CsvImport {
    let mut out = CsvImport::default();

    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    // First non-blank line is the header.
    let _ = lines.next();

    for (idx, line) in lines {
        let fields = split_fields(line);
        match check_row(idx + 1, &fields) {
            Ok(row) => out.rows.push(row),
            Err(e) => {
                warn!(line = e.line, reason = %e.kind, "skipping csv line");
                out.errors.push(e);
            }
        }
    }

    out
}

/// Split on commas outside double quotes, then strip whitespace and one
/// surrounding quote pair from each field.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(clean_field(&current));
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(clean_field(&current));

    fields
}

fn clean_field(raw: &str) -> String {
    let s = raw.trim();
    let s = s.strip_prefix('"').unwrap_or(s);
    let s = s.strip_suffix('"').unwrap_or(s);
    s.trim().to_string()
}
