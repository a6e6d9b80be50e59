//! Report — the versioned snapshot record merging price, signal, and forecast.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::forecast::{ForecastMethod, ForecastPoint};
use super::signal::SignalAction;

/// Latest-bar price snapshot embedded in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub pct_chg: Option<f64>,
}

/// Latest-signal snapshot embedded in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub date: NaiveDate,
    pub action: SignalAction,
    pub signal_score: f64,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub partial: bool,
}

/// Forecast snapshot embedded in a report (the run's points, method,
/// confidence — diagnostics stay on the in-memory `Forecast`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub method: ForecastMethod,
    pub confidence: f64,
    pub points: Vec<ForecastPoint>,
}

/// Versioned per-symbol analysis snapshot.
///
/// The report assembler is the only producer. `version` and `is_latest`
/// are owned by the store: writing a report assigns the next monotonic
/// version and atomically flips the prior latest to false, so exactly one
/// report per symbol is latest at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub symbol: String,
    pub version: u32,
    pub created_at: NaiveDateTime,
    pub is_latest: bool,
    /// BLAKE3 hash over (pipeline config, input bars). Identical inputs
    /// produce identical fingerprints, making idempotent reruns visible.
    pub fingerprint: String,
    pub price: PriceSnapshot,
    pub signal: SignalSnapshot,
    pub forecast: ForecastSnapshot,
    /// Heuristic in [0, 1], monotonic in history depth and indicator
    /// completeness.
    pub data_quality_score: f64,
    /// Pass-through of the forecast cascade's confidence.
    pub prediction_confidence: f64,
    pub analysis_summary: String,
}
