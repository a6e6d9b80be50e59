//! Report assembler — merges the latest price, signal, and forecast into a
//! versioned snapshot record.
//!
//! The assembler is the single boundary where forecast output becomes a
//! durable, queryable artifact, and the only producer of `Report` values.
//! Version numbers and the is_latest flip belong to the store at write
//! time; freshly assembled reports carry version 0.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::{
    Forecast, ForecastSnapshot, PriceBar, PriceSnapshot, Report, Signal, SignalSnapshot,
};
use crate::indicators::IndicatorSet;

/// History-depth tiers for the data quality score, by bar count.
const DEPTH_TIERS: [(usize, f64); 3] = [(250, 1.0), (100, 0.8), (50, 0.6)];
const DEPTH_FLOOR: f64 = 0.4;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("cannot assemble a report from an empty history")]
    EmptyHistory,

    #[error("signal history is empty")]
    NoSignal,
}

/// Assembles Reports. `lookback` bounds the indicator-completeness window
/// of the data quality score.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    lookback: usize,
}

impl ReportAssembler {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 1, "lookback must be >= 1");
        Self { lookback }
    }

    pub fn assemble(
        &self,
        symbol: &str,
        bars: &[PriceBar],
        sets: &[IndicatorSet],
        signals: &[Signal],
        forecast: &Forecast,
        created_at: NaiveDateTime,
        fingerprint: String,
    ) -> Result<Report, AssembleError> {
        let last_bar = bars.last().ok_or(AssembleError::EmptyHistory)?;
        let last_signal = signals.last().ok_or(AssembleError::NoSignal)?;

        let price = PriceSnapshot {
            date: last_bar.date,
            close: last_bar.close,
            open: last_bar.open,
            high: last_bar.high,
            low: last_bar.low,
            volume: last_bar.volume,
            pct_chg: last_bar.pct_chg(),
        };

        let signal = SignalSnapshot {
            date: last_signal.date,
            action: last_signal.action,
            signal_score: last_signal.signal_score,
            ma_short: last_signal.ma_short,
            ma_long: last_signal.ma_long,
            rsi: last_signal.rsi,
            macd: last_signal.macd,
            partial: last_signal.partial,
        };

        let forecast_snapshot = ForecastSnapshot {
            method: forecast.method,
            confidence: forecast.confidence,
            points: forecast.points.clone(),
        };

        let data_quality_score = self.data_quality(bars.len(), sets);
        let analysis_summary = summarize(symbol, &price, &signal, forecast);

        Ok(Report {
            symbol: symbol.to_string(),
            version: 0,
            created_at,
            is_latest: true,
            fingerprint,
            price,
            signal,
            forecast: forecast_snapshot,
            data_quality_score,
            prediction_confidence: forecast.confidence,
            analysis_summary,
        })
    }

    /// Half history depth, half indicator completeness — monotonic in both.
    fn data_quality(&self, bar_count: usize, sets: &[IndicatorSet]) -> f64 {
        let depth = DEPTH_TIERS
            .iter()
            .find(|(min, _)| bar_count >= *min)
            .map(|(_, score)| *score)
            .unwrap_or(DEPTH_FLOOR);

        let window = &sets[sets.len().saturating_sub(self.lookback)..];
        let completeness = if window.is_empty() {
            0.0
        } else {
            let total = window.len() * 6;
            let present: usize = window
                .iter()
                .map(|s| {
                    [
                        s.ma_short,
                        s.ma_long,
                        s.rsi,
                        s.macd,
                        s.macd_signal,
                        s.macd_hist,
                    ]
                    .iter()
                    .flatten()
                    .count()
                })
                .sum();
            present as f64 / total as f64
        };

        0.5 * depth + 0.5 * completeness
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new(30)
    }
}

/// One-line human summary of the report contents.
fn summarize(
    symbol: &str,
    price: &PriceSnapshot,
    signal: &SignalSnapshot,
    forecast: &Forecast,
) -> String {
    let mut parts = Vec::new();

    match price.pct_chg {
        Some(pct) => parts.push(format!(
            "{symbol} closed at {:.2} ({pct:+.2}%)",
            price.close
        )),
        None => parts.push(format!("{symbol} closed at {:.2}", price.close)),
    }

    match (signal.ma_short, signal.ma_long, signal.rsi) {
        (Some(s), Some(l), Some(rsi)) => parts.push(format!(
            "short MA {s:.2} vs long MA {l:.2}, RSI {rsi:.1}"
        )),
        _ => parts.push("indicators still warming up".to_string()),
    }

    parts.push(format!(
        "score {:+.1} -> {}",
        signal.signal_score, signal.action
    ));

    if let Some(first) = forecast.points.first() {
        parts.push(format!(
            "day-1 forecast {:.2} ({:.2}-{:.2}, {})",
            first.predicted_price, first.lower_bound, first.upper_bound, forecast.method
        ));
    }

    parts.join("; ")
}
