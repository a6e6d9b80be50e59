//! Price-history source trait and structured error types.
//!
//! The pipeline never fetches data itself; callers hand it ordered daily
//! bars through this seam. Implementations (CSV directories, synthetic
//! generators, databases) live outside the core.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::PriceBar;

/// Structured errors for history reads.
///
/// `SymbolNotFound` means "no data yet" — callers render it differently
/// from a malformed or failing source.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no price history for symbol '{symbol}'")]
    SymbolNotFound { symbol: String },

    #[error("malformed price history: {0}")]
    Malformed(String),

    #[error("history out of order for '{symbol}' at {date}: bars must ascend with unique dates")]
    OutOfOrder { symbol: String, date: NaiveDate },

    #[error("source I/O error: {0}")]
    Io(String),
}

/// Trait for price-history sources.
///
/// Returned bars are ascending by date with no duplicate dates, truncated
/// to `as_of` (inclusive). Trading-day gaps are the source's policy; the
/// core only consumes the increments it is given.
pub trait PriceHistorySource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Ordered daily bars for a symbol up to and including `as_of`.
    fn read_history(&self, symbol: &str, as_of: NaiveDate) -> Result<Vec<PriceBar>, HistoryError>;
}

/// Validate the ascending/unique-date invariant a source must uphold.
pub fn validate_history(symbol: &str, bars: &[PriceBar]) -> Result<(), HistoryError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(HistoryError::OutOfOrder {
                symbol: symbol.to_string(),
                date: pair[1].date,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn ascending_history_validates() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        assert!(validate_history("TEST", &bars).is_ok());
    }

    #[test]
    fn duplicate_date_is_rejected() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[2].date = bars[1].date;
        let err = validate_history("TEST", &bars).unwrap_err();
        assert!(matches!(err, HistoryError::OutOfOrder { .. }));
    }

    #[test]
    fn descending_date_is_rejected() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars.swap(0, 2);
        assert!(validate_history("TEST", &bars).is_err());
    }
}
