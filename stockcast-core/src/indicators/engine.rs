//! Indicator engine — assembles per-date `IndicatorSet` values.
//!
//! Runs the concrete indicators over a bar series and converts the NAN
//! warmup convention into `Option<f64>` at the domain boundary. Pure:
//! insufficient history yields None fields, never an error. Whether Nones
//! block downstream steps is the caller's decision.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

use super::macd::MacdSeries;
use super::rsi::Rsi;
use super::sma::Sma;
use super::Indicator;

/// Indicator windows. Defaults match the production scoring setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ma_short: usize,
    pub ma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_short: 10,
            ma_long: 30,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

/// Derived indicator values for one trading date.
///
/// Fields are None until enough trailing history exists for their window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub date: NaiveDate,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
}

/// Computes the full `IndicatorSet` history for a bar series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    /// One `IndicatorSet` per input bar, date-aligned.
    pub fn compute(&self, bars: &[PriceBar]) -> Vec<IndicatorSet> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let ma_short = Sma::new(self.config.ma_short).compute(bars);
        let ma_long = Sma::new(self.config.ma_long).compute(bars);
        let rsi = Rsi::new(self.config.rsi_period).compute(bars);
        let macd = MacdSeries::compute(
            &closes,
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
        );

        bars.iter()
            .enumerate()
            .map(|(i, bar)| IndicatorSet {
                date: bar.date,
                ma_short: opt(ma_short[i]),
                ma_long: opt(ma_long[i]),
                rsi: opt(rsi[i]),
                macd: opt(macd.macd[i]),
                macd_signal: opt(macd.signal[i]),
                macd_hist: opt(macd.histogram[i]),
            })
            .collect()
    }

    /// The most recent `IndicatorSet`, if any bars exist.
    pub fn latest(&self, bars: &[PriceBar]) -> Option<IndicatorSet> {
        self.compute(bars).pop()
    }
}

fn opt(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}
