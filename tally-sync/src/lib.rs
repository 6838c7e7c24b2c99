//! tally-sync: provider boundary, live dashboard, and batch import

pub mod dashboard;
pub mod document;
pub mod error;
pub mod import;
pub mod provider;
pub mod session;

pub use dashboard::{Dashboard, DashboardView};
pub use document::TransactionDocument;
pub use error::{SyncError, SyncResult};
pub use import::{ImportFailure, ImportMode, ImportOptions, ImportReport, import_csv, import_records};
pub use provider::{LocalProvider, SnapshotCallback, Subscription, TransactionProvider};
pub use session::Session;
