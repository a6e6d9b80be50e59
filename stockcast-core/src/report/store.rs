//! Report store trait — the persistence seam.
//!
//! The assembler produces Reports; the store owns versions and the
//! is_latest pointer. Writing must be atomic with respect to the latest
//! flip: at no instant may two reports for one symbol both read as latest.

use thiserror::Error;

use crate::domain::Report;

/// Structured errors for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Trait for report stores.
///
/// Implementations guarantee that `write_report` assigns the next
/// monotonic version for the symbol and flips the prior latest to false
/// as one atomic transition.
pub trait ReportStore: Send + Sync {
    /// Persist a new report version. Returns the assigned version.
    fn write_report(&self, report: Report) -> Result<u32, StoreError>;

    /// The current latest report for a symbol, if any.
    fn latest(&self, symbol: &str) -> Result<Option<Report>, StoreError>;

    /// All versions for a symbol, ascending by version.
    fn history(&self, symbol: &str) -> Result<Vec<Report>, StoreError>;
}
