//! Signal — the scored technical-indicator verdict for one trading day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Discrete action label derived from the signal score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    Buy,
    Hold,
    Trim,
}

impl SignalAction {
    /// Wire name used in report snapshots and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalAction::Buy => "BUY",
            SignalAction::Hold => "HOLD",
            SignalAction::Trim => "TRIM",
        }
    }
}

impl std::fmt::Display for SignalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored signal for one (symbol, date).
///
/// The score is the sum of three independently clamped terms (crossover,
/// RSI distance-from-neutral, MACD cross), so it lives in [-35, +45].
/// `partial` is set when any term saw a missing indicator and contributed
/// zero — a degraded reading, not a real zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub date: NaiveDate,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal_score: f64,
    pub action: SignalAction,
    pub partial: bool,
}
