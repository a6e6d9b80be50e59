//! Concrete indicator implementations.
//!
//! All indicators implement the `Indicator` trait: bar history in, numeric
//! series out, with a `f64::NAN` warmup prefix. The `IndicatorEngine`
//! assembles them into per-date `IndicatorSet` values (NaN becomes None at
//! that boundary) for the signal scorer.

pub mod ema;
pub mod engine;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::Ema;
pub use engine::{IndicatorConfig, IndicatorEngine, IndicatorSet};
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::PriceBar;

/// Trait for indicators.
///
/// Indicators are pure functions of the bar window: they take the full bar
/// series and produce an output series of the same length. The first
/// `lookback()` values are `f64::NAN` (warmup). No value at bar t may depend
/// on data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_10", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLC around each close: open = prev close (or close
/// for the first bar), high/low bracket open and close, volume fixed.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let volumes = vec![1000_u64; closes.len()];
    make_bars_with_volumes(closes, &volumes)
}

/// Like `make_bars`, but with explicit per-bar volumes (for vol_z tests).
#[cfg(test)]
pub fn make_bars_with_volumes(closes: &[f64], volumes: &[u64]) -> Vec<PriceBar> {
    assert_eq!(closes.len(), volumes.len());
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let pre_close = if i == 0 { close } else { closes[i - 1] };
            let open = pre_close;
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            PriceBar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                pre_close,
                volume,
                amount: close * volume as f64,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
