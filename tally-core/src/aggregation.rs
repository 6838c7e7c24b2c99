//! Pure reducers over a transaction snapshot.
//!
//! Every function here is total: an empty slice gives zeros, and malformed
//! records (unknown type, non-positive amount) contribute nothing.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Transaction, TransactionType};

/// Sum of income amounts.
pub fn total_income(txns: &[Transaction]) -> f64 {
    txns.iter()
        .filter(|t| t.kind.is_income())
        .map(Transaction::contribution)
        .sum()
}

/// Sum of expense amounts.
pub fn total_expenses(txns: &[Transaction]) -> f64 {
    txns.iter()
        .filter(|t| t.kind.is_expense())
        .map(Transaction::contribution)
        .sum()
}

/// Income minus expenses. Negative means a deficit.
pub fn net_balance(txns: &[Transaction]) -> f64 {
    total_income(txns) - total_expenses(txns)
}

/// Net balance as a percentage of income; 0 when there is no income.
pub fn savings_rate(txns: &[Transaction]) -> f64 {
    let income = total_income(txns);
    if income > 0.0 {
        net_balance(txns) / income * 100.0
    } else {
        0.0
    }
}

/// Spending total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Expense totals per category, in first-seen order.
pub fn group_by_category(txns: &[Transaction]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CategoryTotal> = Vec::new();

    for t in txns.iter().filter(|t| t.kind.is_expense()) {
        match index.get(t.category.as_str()) {
            Some(&i) => out[i].total += t.contribution(),
            None => {
                index.insert(t.category.as_str(), out.len());
                out.push(CategoryTotal {
                    category: t.category.clone(),
                    total: t.contribution(),
                });
            }
        }
    }

    out
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Twelve buckets (January = 0) for `year`. Other years are excluded entirely.
pub fn monthly_buckets(txns: &[Transaction], year: i32) -> [MonthlyTotals; 12] {
    let mut months = [MonthlyTotals::default(); 12];

    for t in txns.iter().filter(|t| t.date.year() == year) {
        let bucket = &mut months[t.date.month0() as usize];
        match t.kind {
            TransactionType::Income => bucket.income += t.contribution(),
            TransactionType::Expense => bucket.expenses += t.contribution(),
            TransactionType::Unrecognized(_) => {}
        }
    }

    months
}

/// Counts and averages over a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub count: usize,
    pub income_count: usize,
    pub expense_count: usize,
    pub average_income: f64,
    pub average_expense: f64,
}

pub fn transaction_stats(txns: &[Transaction]) -> TransactionStats {
    let income_count = txns.iter().filter(|t| t.kind.is_income()).count();
    let expense_count = txns.iter().filter(|t| t.kind.is_expense()).count();

    TransactionStats {
        count: txns.len(),
        income_count,
        expense_count,
        average_income: average(total_income(txns), income_count),
        average_expense: average(total_expenses(txns), expense_count),
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Balance summary shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub count: usize,
}

impl Summary {
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        let income = total_income(txns);
        let expenses = total_expenses(txns);
        Self {
            income,
            expenses,
            net: income - expenses,
            count: txns.len(),
        }
    }

    pub fn is_deficit(&self) -> bool {
        self.net < 0.0
    }
}
