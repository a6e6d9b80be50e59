//! PriceBar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single symbol.
///
/// Bars arrive from an external ingestion collaborator, ascending by date,
/// one per trading day, unique on (symbol, date). The pipeline only ever
/// reads trailing windows of them; it never mutates a bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Previous trading day's close, as reported by the data source.
    pub pre_close: f64,
    pub volume: u64,
    /// Traded amount (price × volume aggregate) as reported by the source.
    pub amount: f64,
}

impl PriceBar {
    /// Day-over-day percent change relative to `pre_close`.
    ///
    /// None when the reported pre_close is zero or non-finite.
    pub fn pct_chg(&self) -> Option<f64> {
        if self.pre_close.is_finite() && self.pre_close != 0.0 && self.close.is_finite() {
            Some((self.close - self.pre_close) / self.pre_close * 100.0)
        } else {
            None
        }
    }

    /// Basic OHLC sanity check: high is the top, low is the bottom,
    /// close is positive and finite.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite()
            && self.close > 0.0
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            symbol: "AAPL".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            pre_close: 100.0,
            volume: 50_000,
            amount: 5_150_000.0,
        }
    }

    #[test]
    fn pct_chg_from_pre_close() {
        let bar = sample_bar();
        let pct = bar.pct_chg().unwrap();
        assert!((pct - 3.0).abs() < 1e-10);
    }

    #[test]
    fn pct_chg_none_when_pre_close_zero() {
        let mut bar = sample_bar();
        bar.pre_close = 0.0;
        assert!(bar.pct_chg().is_none());
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar.symbol, deser.symbol);
        assert_eq!(bar.date, deser.date);
        assert_eq!(bar.close, deser.close);
        assert_eq!(bar.volume, deser.volume);
    }
}
