//! Feature builder — the lagged/rolling feature matrix for regression
//! forecasting, plus the mutable rolling window used for recursive
//! multi-step prediction.
//!
//! Features per row (in matrix column order): ret1, ma5, ma10, ema12,
//! ema26, vol_z. Rows with any undefined dependency are dropped; with the
//! default windows the first valid row is at bar index 25 (set by EMA26).
//! The training target is the next day's close price — the inverse
//! transform back to price is the identity.

use chrono::NaiveDate;

use crate::domain::PriceBar;
use crate::indicators::ema::smoothing;
use crate::indicators::sma::rolling_mean;
use crate::indicators::{Ema, Indicator, Sma};

/// Number of features per row.
pub const FEATURE_COUNT: usize = 6;

/// Volume z-score window.
const VOL_WINDOW: usize = 20;

/// Per-step decay applied to vol_z during recursive forecasting, where no
/// future volume observations exist.
const VOL_Z_DECAY: f64 = 0.95;

/// One row of the feature matrix, date-aligned with its source bar.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub date: NaiveDate,
    /// Close of the source bar — the *next* row's target.
    pub close: f64,
    pub ret1: f64,
    pub ma5: f64,
    pub ma10: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub vol_z: f64,
}

impl FeatureRow {
    /// Feature vector in canonical column order.
    pub fn vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.ret1, self.ma5, self.ma10, self.ema12, self.ema26, self.vol_z,
        ]
    }
}

/// Row-aligned feature matrix over a bar series.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub rows: Vec<FeatureRow>,
}

impl FeatureMatrix {
    /// Derive the matrix, dropping rows with insufficient trailing history.
    pub fn build(bars: &[PriceBar]) -> Self {
        let n = bars.len();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

        let ma5 = Sma::new(5).compute(bars);
        let ma10 = Sma::new(10).compute(bars);
        let ema12 = Ema::new(12).compute(bars);
        let ema26 = Ema::new(26).compute(bars);
        let vol_mean = rolling_mean(&volumes, VOL_WINDOW);
        let vol_std = rolling_std(&volumes, VOL_WINDOW);

        let mut rows = Vec::new();
        for i in 1..n {
            if ema26[i].is_nan() || vol_mean[i].is_nan() {
                continue;
            }
            let prev_close = closes[i - 1];
            if prev_close == 0.0 {
                continue;
            }
            let vol_z = if vol_std[i] > 0.0 {
                (volumes[i] - vol_mean[i]) / vol_std[i]
            } else {
                0.0
            };
            rows.push(FeatureRow {
                date: bars[i].date,
                close: closes[i],
                ret1: closes[i] / prev_close - 1.0,
                ma5: ma5[i],
                ma10: ma10[i],
                ema12: ema12[i],
                ema26: ema26[i],
                vol_z,
            });
        }

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Training pairs: each row's feature vector against the *next* row's
    /// close. The final row has no target and seeds the forecast instead.
    pub fn training_pairs(&self) -> Vec<([f64; FEATURE_COUNT], f64)> {
        self.rows
            .windows(2)
            .map(|pair| (pair[0].vector(), pair[1].close))
            .collect()
    }
}

/// Rolling window state threaded through recursive multi-step forecasting.
///
/// Each forecast step treats the predicted price as if it were an observed
/// close: ret1/ma5/ma10 are recomputed exactly from the trailing synthetic
/// close window, EMA12/EMA26 advance by their recurrences, and vol_z decays
/// toward zero since no future volume exists.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    closes: Vec<f64>,
    ema12: f64,
    ema26: f64,
    vol_z: f64,
}

impl RollingWindow {
    /// Seed the window from the last feature row of a bar series.
    ///
    /// `closes` must hold at least the trailing 10 closes (newest last).
    pub fn new(closes: Vec<f64>, ema12: f64, ema26: f64, vol_z: f64) -> Self {
        assert!(closes.len() >= 10, "rolling window needs 10 trailing closes");
        Self {
            closes,
            ema12,
            ema26,
            vol_z,
        }
    }

    /// Current feature vector, canonical column order.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        let n = self.closes.len();
        let last = self.closes[n - 1];
        let prev = self.closes[n - 2];
        let ret1 = if prev != 0.0 { last / prev - 1.0 } else { 0.0 };
        [
            ret1,
            mean(&self.closes[n - 5..]),
            mean(&self.closes[n - 10..]),
            self.ema12,
            self.ema26,
            self.vol_z,
        ]
    }

    /// Absorb a predicted close as if it had been observed.
    pub fn push(&mut self, predicted_close: f64) {
        self.closes.push(predicted_close);
        if self.closes.len() > 10 {
            self.closes.remove(0);
        }
        let k12 = smoothing(12);
        let k26 = smoothing(26);
        self.ema12 = k12 * predicted_close + (1.0 - k12) * self.ema12;
        self.ema26 = k26 * predicted_close + (1.0 - k26) * self.ema26;
        self.vol_z *= VOL_Z_DECAY;
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rolling sample standard deviation (ddof = 1), NAN-prefixed.
fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window < 2 || n < window {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        let m = mean(slice);
        let var = slice.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (window - 1) as f64;
        out[i] = var.sqrt();
    }
    out
}
