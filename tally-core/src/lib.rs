//! tally-core: transaction model, aggregation, validation and filtering

pub mod aggregation;
pub mod categories;
pub mod filter;
pub mod format;
pub mod model;
pub mod time;
pub mod validation;

pub use aggregation::{
    CategoryTotal, MonthlyTotals, Summary, TransactionStats, group_by_category, monthly_buckets,
    net_balance, savings_rate, total_expenses, total_income,
    transaction_stats,
};
pub use filter::{DateRange, TransactionFilter, sort_newest_first};
pub use model::{NewTransaction, Transaction, TransactionDraft, TransactionType};
pub use time::{DateInput, ProviderTimestamp, current_year, parse_iso_date, today_in};
pub use validation::{Field, FieldError, ValidationReport, validate_transaction};
