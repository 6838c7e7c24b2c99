//! Plain-text output for the terminal.

use std::fmt::Write;
use tally_core::categories::categories_for;
use tally_core::format::{format_currency, short_month_name, truncate_text};
use tally_core::{Transaction, TransactionType, savings_rate};
use tally_sync::{DashboardView, ImportReport};

const DESCRIPTION_WIDTH: usize = 32;

/// `filtered` only changes the wording when nothing is left to show.
pub fn transaction_table(txns: &[Transaction], currency: &str, filtered: bool) -> String {
    if txns.is_empty() {
        let msg = if filtered {
            "No transactions match the filters.\n"
        } else {
            "No transactions found.\n"
        };
        return msg.to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<10} {:<8} {:<16} {:>14}  {}",
        "ID", "DATE", "TYPE", "CATEGORY", "AMOUNT", "DESCRIPTION"
    );
    for t in txns {
        let _ = writeln!(
            out,
            "{:<12} {:<10} {:<8} {:<16} {:>14}  {}",
            t.id.as_deref().unwrap_or("-"),
            t.date.format("%Y-%m-%d"),
            t.kind.label(),
            truncate_text(&t.category, 16),
            format_currency(t.signed_amount(), currency),
            truncate_text(&t.description, DESCRIPTION_WIDTH),
        );
    }
    out
}

pub fn summary_report(greeting: &str, view: &DashboardView, currency: &str) -> String {
    let s = &view.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Hello, {greeting}\n");
    let _ = writeln!(out, "Income:    {:>14}", format_currency(s.income, currency));
    let _ = writeln!(out, "Expenses:  {:>14}", format_currency(s.expenses, currency));
    let _ = writeln!(out, "Balance:   {:>14}", format_currency(s.net, currency));
    let _ = writeln!(out, "Savings:   {:>13.1}%", savings_rate(&view.transactions));
    let _ = writeln!(out, "Records:   {:>14}", s.count);
    if s.is_deficit() {
        let _ = writeln!(out, "\nSpending exceeds income.");
    }

    if !view.categories.is_empty() {
        let _ = writeln!(out, "\nExpenses by category");
        for c in &view.categories {
            let _ = writeln!(out, "  {:<18} {:>14}", c.category, format_currency(c.total, currency));
        }
    }

    let _ = writeln!(out, "\nMonthly {}", view.year);
    for (i, m) in view.monthly.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<4} in {:>12}  out {:>12}",
            short_month_name(i),
            format_currency(m.income, currency),
            format_currency(m.expenses, currency),
        );
    }
    out
}

pub fn import_report(report: &ImportReport) -> String {
    let mut out = format!(
        "Imported {} transactions ({} errors)\n",
        report.success_count(),
        report.error_count()
    );
    for f in &report.failures {
        let _ = writeln!(out, "  line {}: {}", f.line, f.reason);
    }
    out
}

pub fn category_lists() -> String {
    let mut out = String::new();
    for kind in [TransactionType::Expense, TransactionType::Income] {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{} categories:", kind.label());
        for c in categories_for(&kind) {
            let _ = writeln!(out, "  {c}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::TransactionFilter;

    fn sample() -> Vec<Transaction> {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        vec![
            Transaction::expense("Food", 12.5, "Lunch", d).with_id("txn-000002"),
            Transaction::income("Salary", 1000.0, "Pay", d).with_id("txn-000001"),
        ]
    }

    #[test]
    fn test_table_shows_signed_amounts() {
        let table = transaction_table(&sample(), "USD", false);
        assert!(table.contains("txn-000002"));
        assert!(table.contains("Expense"));
        assert!(table.contains("-$12.50"));
        assert!(table.contains("$1,000.00"));
    }

    #[test]
    fn test_empty_table_wording() {
        assert_eq!(transaction_table(&[], "USD", false), "No transactions found.\n");
        assert_eq!(transaction_table(&[], "USD", true), "No transactions match the filters.\n");
    }

    #[test]
    fn test_category_lists() {
        let text = category_lists();
        assert!(text.starts_with("Expense categories:\n  Food\n"));
        assert!(text.contains("\nIncome categories:\n  Salary\n"));
    }

    #[test]
    fn test_summary_lists_months_and_categories() {
        let view = DashboardView::compute(&sample(), &TransactionFilter::default(), 2024);
        let text = summary_report("alice", &view, "USD");
        assert!(text.starts_with("Hello, alice"));
        assert!(text.contains("Balance:"));
        assert!(text.contains("$987.50"));
        assert!(text.contains("Food"));
        assert!(text.contains("Jan"));
        assert!(!text.contains("Spending exceeds income."));
    }
}
