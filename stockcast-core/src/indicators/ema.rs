//! Exponential Moving Average (EMA).
//!
//! Recurrence: EMA[t] = k * close[t] + (1 - k) * EMA[t-1], k = 2/(span+1).
//! Seed: EMA[span-1] = SMA of the first `span` close values.
//! Lookback: span - 1.

use crate::domain::PriceBar;

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.span.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_series(&closes, self.span)
    }
}

/// Smoothing factor for a given span.
pub(crate) fn smoothing(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA of an arbitrary f64 series, SMA-seeded, NAN-prefixed.
///
/// Shared by the MACD signal line (EMA of the MACD series) and the
/// feature builder.
pub(crate) fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if span == 0 || n < span {
        return out;
    }

    let k = smoothing(span);
    let seed: f64 = values[..span].iter().sum::<f64>() / span as f64;
    out[span - 1] = seed;

    let mut prev = seed;
    for i in span..n {
        let ema = k * values[i] + (1.0 - k) * prev;
        out[i] = ema;
        prev = ema;
    }
    out
}
