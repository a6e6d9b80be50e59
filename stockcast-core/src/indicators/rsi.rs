//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses over one-day close
//! deltas. RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period (needs `period` deltas, so period+1 bars).
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → 50.

use crate::domain::PriceBar;

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut out = vec![f64::NAN; n];
        if n < self.period + 1 {
            return out;
        }

        // Seed: simple average gain/loss over the first `period` deltas.
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 1..=self.period {
            let delta = bars[i].close - bars[i - 1].close;
            if delta > 0.0 {
                avg_gain += delta;
            } else {
                avg_loss -= delta;
            }
        }
        avg_gain /= self.period as f64;
        avg_loss /= self.period as f64;
        out[self.period] = rsi_value(avg_gain, avg_loss);

        // Wilder smoothing for subsequent bars.
        let alpha = 1.0 / self.period as f64;
        for i in (self.period + 1)..n {
            let delta = bars[i].close - bars[i - 1].close;
            let gain = delta.max(0.0);
            let loss = (-delta).max(0.0);
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
            out[i] = rsi_value(avg_gain, avg_loss);
        }

        out
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement at all
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains_is_100() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_series_is_50() {
        let bars = make_bars(&[100.0; 6]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 50.0, 1e-6);
    }

    #[test]
    fn rsi_within_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_warmup_prefix() {
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(result[3] > 0.0 && result[3] < 100.0);
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
