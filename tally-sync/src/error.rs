use tally_core::ValidationReport;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failures at the provider boundary.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("transaction not found: {0}")]
    NotFound(String),

    #[error("invalid transaction: {0}")]
    Invalid(#[from] ValidationReport),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
