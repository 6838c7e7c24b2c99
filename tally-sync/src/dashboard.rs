//! Live dashboard: recomputes every derived view from each pushed snapshot.

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tally_core::{
    CategoryTotal, MonthlyTotals, Summary, Transaction, TransactionFilter, TransactionStats,
    group_by_category, monthly_buckets, transaction_stats,
};
use tracing::debug;

use crate::provider::{SnapshotCallback, Subscription, TransactionProvider};
use crate::session::Session;

/// Everything the dashboard shows, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub year: i32,
    pub summary: Summary,
    pub stats: TransactionStats,
    pub categories: Vec<CategoryTotal>,
    pub monthly: [MonthlyTotals; 12],
    /// Filtered records, newest first
    pub transactions: Vec<Transaction>,
}

impl DashboardView {
    pub fn compute(snapshot: &[Transaction], filter: &TransactionFilter, year: i32) -> Self {
        let txns = filter.apply(snapshot);
        Self {
            year,
            summary: Summary::from_transactions(&txns),
            stats: transaction_stats(&txns),
            categories: group_by_category(&txns),
            monthly: monthly_buckets(&txns, year),
            transactions: txns,
        }
    }

    pub fn empty(year: i32) -> Self {
        Self::compute(&[], &TransactionFilter::default(), year)
    }
}

/// Subscribes to a provider and keeps the view for the latest snapshot.
///
/// Each delivery replaces the view wholesale; the last one delivered wins.
pub struct Dashboard {
    view: Arc<Mutex<DashboardView>>,
    deliveries: Arc<Mutex<usize>>,
    subscription: Subscription,
}

impl Dashboard {
    pub fn attach(
        provider: &dyn TransactionProvider,
        session: &Session,
        filter: TransactionFilter,
        year: i32,
    ) -> Self {
        let view = Arc::new(Mutex::new(DashboardView::empty(year)));
        let deliveries = Arc::new(Mutex::new(0usize));

        let (sink, counter) = (Arc::clone(&view), Arc::clone(&deliveries));
        let callback: SnapshotCallback = Arc::new(move |snapshot: Vec<Transaction>| {
            let next = DashboardView::compute(&snapshot, &filter, year);
            debug!(records = next.transactions.len(), net = next.summary.net, "dashboard recomputed");
            *sink.lock().unwrap_or_else(PoisonError::into_inner) = next;
            *counter.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        });

        let subscription = provider.subscribe(session, callback);
        Self {
            view,
            deliveries,
            subscription,
        }
    }

    /// Copy of the current view.
    pub fn view(&self) -> DashboardView {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of snapshots received so far.
    pub fn deliveries(&self) -> usize {
        *self.deliveries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop listening. The last view stays readable through the returned copy.
    pub fn detach(self) -> DashboardView {
        let view = self.view();
        self.subscription.cancel();
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LocalProvider;
    use chrono::NaiveDate;
    use tally_core::{NewTransaction, TransactionType};

    fn new_txn(kind: TransactionType, category: &str, amount: f64, m: u32, d: u32) -> NewTransaction {
        NewTransaction {
            kind,
            category: category.into(),
            amount,
            description: "test".into(),
            date: NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
        }
    }

    #[test]
    fn test_view_tracks_latest_snapshot() {
        let provider = LocalProvider::in_memory(chrono_tz::UTC);
        let me = Session::new("u1");
        let dash = Dashboard::attach(&provider, &me, TransactionFilter::default(), 2024);
        assert_eq!(dash.deliveries(), 1);
        assert_eq!(dash.view().summary, Summary::default());

        provider.create(&me, new_txn(TransactionType::Income, "Salary", 1000.0, 1, 1)).unwrap();
        provider.create(&me, new_txn(TransactionType::Expense, "Rent", 200.0, 1, 15)).unwrap();
        provider.create(&me, new_txn(TransactionType::Expense, "Food", 50.0, 2, 1)).unwrap();

        let view = dash.view();
        assert_eq!(dash.deliveries(), 4);
        assert_eq!(view.summary.net, 750.0);
        assert_eq!(view.monthly[0], MonthlyTotals { income: 1000.0, expenses: 200.0 });
        assert_eq!(view.monthly[1], MonthlyTotals { income: 0.0, expenses: 50.0 });
        assert_eq!(view.categories.len(), 2);
        assert_eq!(view.stats.expense_count, 2);
    }

    #[test]
    fn test_filtered_view() {
        let provider = LocalProvider::in_memory(chrono_tz::UTC);
        let me = Session::new("u1");
        provider.create(&me, new_txn(TransactionType::Income, "Salary", 1000.0, 1, 1)).unwrap();
        provider.create(&me, new_txn(TransactionType::Expense, "Food", 50.0, 2, 1)).unwrap();

        let filter = TransactionFilter::new().with_kind(TransactionType::Expense);
        let dash = Dashboard::attach(&provider, &me, filter, 2024);
        let view = dash.view();
        assert_eq!(view.summary.income, 0.0);
        assert_eq!(view.summary.expenses, 50.0);
        assert_eq!(view.transactions.len(), 1);
    }

    #[test]
    fn test_detach_stops_updates() {
        let provider = LocalProvider::in_memory(chrono_tz::UTC);
        let me = Session::new("u1");
        let dash = Dashboard::attach(&provider, &me, TransactionFilter::default(), 2024);
        let last = dash.detach();
        provider.create(&me, new_txn(TransactionType::Income, "Salary", 10.0, 1, 1)).unwrap();
        assert_eq!(last.summary.count, 0);
    }
}
