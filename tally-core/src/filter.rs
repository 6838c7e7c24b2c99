//! History filtering and ordering over a snapshot.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{Transaction, TransactionType};

/// Relative date presets offered by the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// Last 7 days
    Week,
    /// Last calendar month
    Month,
    /// Last year
    Year,
}

impl DateRange {
    /// Inclusive `(start, end)` for this preset, relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let start = match self {
            DateRange::All => return (None, None),
            DateRange::Today => Some(today),
            DateRange::Week => today.checked_sub_days(chrono::Days::new(7)),
            DateRange::Month => today.checked_sub_months(Months::new(1)),
            DateRange::Year => today.checked_sub_months(Months::new(12)),
        };
        (start, Some(today))
    }
}

impl std::str::FromStr for DateRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            other => Err(anyhow::anyhow!("unknown date range: {other}")),
        }
    }
}

/// Conjunctive filter; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Replace the date bounds with a preset's.
    pub fn with_range(mut self, range: DateRange, today: NaiveDate) -> Self {
        let (start, end) = range.bounds(today);
        self.start = start;
        self.end = end;
        self
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some() || self.category.is_some() || self.start.is_some() || self.end.is_some()
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = &self.kind {
            if &txn.kind != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &txn.category != category {
                return false;
            }
        }
        if let Some(start) = self.start {
            if txn.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if txn.date > end {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, txns: &[Transaction]) -> Vec<Transaction> {
        txns.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

/// Order by date, newest first. Same-day records keep their relative order.
pub fn sort_newest_first(txns: &mut [Transaction]) {
    txns.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn history() -> Vec<Transaction> {
        vec![
            Transaction::income("Salary", 3000.0, "March pay", d(2024, 3, 1)),
            Transaction::expense("Food", 20.0, "Lunch", d(2024, 3, 10)),
            Transaction::expense("Travel", 300.0, "Train", d(2024, 2, 20)),
            Transaction::expense("Food", 45.0, "Dinner", d(2024, 3, 15)),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = TransactionFilter::new();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&history()).len(), 4);
    }

    #[test]
    fn test_kind_and_category() {
        let filter = TransactionFilter::new()
            .with_kind(TransactionType::Expense)
            .with_category("Food");
        let out = filter.apply(&history());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.category == "Food"));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = TransactionFilter::new()
            .with_start(d(2024, 3, 1))
            .with_end(d(2024, 3, 10));
        let out = filter.apply(&history());
        let descriptions: Vec<_> = out.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["March pay", "Lunch"]);
    }

    #[test]
    fn test_range_presets() {
        let today = d(2024, 3, 31);
        assert_eq!(DateRange::All.bounds(today), (None, None));
        assert_eq!(DateRange::Today.bounds(today), (Some(today), Some(today)));
        assert_eq!(DateRange::Week.bounds(today).0, Some(d(2024, 3, 24)));
        // Month arithmetic clamps to the end of a shorter month
        assert_eq!(DateRange::Month.bounds(today).0, Some(d(2024, 2, 29)));
        assert_eq!(DateRange::Year.bounds(today).0, Some(d(2023, 3, 31)));

        let filter = TransactionFilter::new().with_range(DateRange::Week, d(2024, 3, 16));
        assert_eq!(filter.apply(&history()).len(), 2);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut txns = history();
        sort_newest_first(&mut txns);
        let dates: Vec<_> = txns.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![d(2024, 3, 15), d(2024, 3, 10), d(2024, 3, 1), d(2024, 2, 20)]);
    }
}
