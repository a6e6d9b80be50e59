//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EMA(close, fast) - EMA(close, slow); signal = EMA(MACD, span);
//! histogram = MACD - signal.
//! MACD defined from index slow-1; signal and histogram from index
//! slow-1 + span-1 (the signal EMA seeds on the first `span` valid MACD
//! values).

use crate::domain::PriceBar;

use super::ema::ema_series;
use super::Indicator;

/// All three MACD output series, computed in one pass.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    /// Compute MACD/signal/histogram over a close series.
    pub fn compute(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires slow > fast >= 1");
        assert!(signal_span >= 1, "MACD signal span must be >= 1");

        let n = closes.len();
        let fast_ema = ema_series(closes, fast);
        let slow_ema = ema_series(closes, slow);

        let mut macd = vec![f64::NAN; n];
        for i in 0..n {
            if !fast_ema[i].is_nan() && !slow_ema[i].is_nan() {
                macd[i] = fast_ema[i] - slow_ema[i];
            }
        }

        // Signal line: EMA over the valid MACD suffix, spliced back so the
        // warmup prefix stays NAN.
        let mut signal = vec![f64::NAN; n];
        if n >= slow {
            let valid_start = slow - 1;
            let suffix = ema_series(&macd[valid_start..], signal_span);
            for (offset, v) in suffix.into_iter().enumerate() {
                signal[valid_start + offset] = v;
            }
        }

        let mut histogram = vec![f64::NAN; n];
        for i in 0..n {
            if !macd[i].is_nan() && !signal[i].is_nan() {
                histogram[i] = macd[i] - signal[i];
            }
        }

        Self {
            macd,
            signal,
            histogram,
        }
    }
}

/// Which MACD output a single-series `Indicator` instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

/// MACD as a single-series indicator (one named instance per line).
#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal_span: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal_span: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires slow > fast >= 1");
        let suffix = match line {
            MacdLine::Macd => "",
            MacdLine::Signal => "_signal",
            MacdLine::Histogram => "_hist",
        };
        Self {
            fast,
            slow,
            signal_span,
            line,
            name: format!("macd_{fast}_{slow}_{signal_span}{suffix}"),
        }
    }

    pub fn default_params(line: MacdLine) -> Self {
        Self::new(12, 26, 9, line)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.slow - 1,
            MacdLine::Signal | MacdLine::Histogram => self.slow - 1 + self.signal_span - 1,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let series = MacdSeries::compute(&closes, self.fast, self.slow, self.signal_span);
        match self.line {
            MacdLine::Macd => series.macd,
            MacdLine::Signal => series.signal,
            MacdLine::Histogram => series.histogram,
        }
    }
}
