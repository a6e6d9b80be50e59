//! Signal scorer — combines indicator readings into a bounded score and a
//! discrete BUY/HOLD/TRIM action.
//!
//! Three additive terms, each independently clamped:
//! - Crossover: ±20 when the short MA crosses the long MA this bar
//! - RSI: clamp(50 - |RSI - 50|, -15, +15), rewarding a neutral RSI
//! - MACD: +10 when the MACD line crosses above its signal line this bar
//!
//! Total range is [-35, +45] (min = -20 - 15 + 0, max = +20 + 15 + 10).
//! The constants are hand-tuned policy values carried as configuration,
//! asymmetry included.

use serde::{Deserialize, Serialize};

use crate::domain::{Signal, SignalAction};
use crate::indicators::IndicatorSet;

/// Scoring constants and action thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points awarded (or deducted) on an MA cross-up (cross-down).
    pub crossover_weight: f64,
    /// Clamp magnitude for the RSI neutrality term.
    pub rsi_clamp: f64,
    /// Points awarded on a MACD cross above its signal line.
    pub macd_weight: f64,
    /// Score at or above which the action is BUY.
    pub buy_threshold: f64,
    /// Score at or below which the action is TRIM.
    pub trim_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            crossover_weight: 20.0,
            rsi_clamp: 15.0,
            macd_weight: 10.0,
            buy_threshold: 15.0,
            trim_threshold: -15.0,
        }
    }
}

/// Scores `IndicatorSet` pairs into `Signal`s.
#[derive(Debug, Clone, Default)]
pub struct SignalScorer {
    config: ScoringConfig,
}

impl SignalScorer {
    pub fn new(config: ScoringConfig) -> Self {
        assert!(
            config.buy_threshold > config.trim_threshold,
            "buy_threshold must exceed trim_threshold"
        );
        Self { config }
    }

    /// Score one bar given its indicator set and the previous bar's.
    ///
    /// Crossover and MACD terms need the previous set to detect a cross;
    /// without it (bar zero) they contribute nothing and the signal is
    /// flagged partial. Any term whose inputs are None likewise contributes
    /// zero and sets the flag — a missing reading is degraded data, not a
    /// real zero.
    pub fn score(&self, prev: Option<&IndicatorSet>, curr: &IndicatorSet) -> Signal {
        let mut score = 0.0;
        let mut partial = false;

        // Crossover term: previous short <= long AND current short > long
        // (cross-up), or the mirror image (cross-down). Strictly
        // previous-vs-current — reversing the two bars flips the direction.
        match crossover_inputs(prev, curr) {
            Some((ps, pl, cs, cl)) => {
                if ps <= pl && cs > cl {
                    score += self.config.crossover_weight;
                } else if ps >= pl && cs < cl {
                    score -= self.config.crossover_weight;
                }
            }
            None => partial = true,
        }

        // RSI term: distance from the neutral 50, clamped symmetrically.
        match curr.rsi {
            Some(rsi) => {
                let term = 50.0 - (rsi - 50.0).abs();
                score += term.clamp(-self.config.rsi_clamp, self.config.rsi_clamp);
            }
            None => partial = true,
        }

        // MACD term: rewards only a fresh cross above the signal line.
        match macd_inputs(prev, curr) {
            Some((pm, psig, cm, csig)) => {
                if pm <= psig && cm > csig {
                    score += self.config.macd_weight;
                }
            }
            None => partial = true,
        }

        let action = if score >= self.config.buy_threshold {
            SignalAction::Buy
        } else if score <= self.config.trim_threshold {
            SignalAction::Trim
        } else {
            SignalAction::Hold
        };

        Signal {
            date: curr.date,
            ma_short: curr.ma_short,
            ma_long: curr.ma_long,
            rsi: curr.rsi,
            macd: curr.macd,
            signal_score: score,
            action,
            partial,
        }
    }

    /// Score every bar of an indicator history (bar zero has no previous
    /// set and scores partial).
    pub fn score_series(&self, sets: &[IndicatorSet]) -> Vec<Signal> {
        sets.iter()
            .enumerate()
            .map(|(i, curr)| {
                let prev = if i > 0 { Some(&sets[i - 1]) } else { None };
                self.score(prev, curr)
            })
            .collect()
    }
}

fn crossover_inputs(
    prev: Option<&IndicatorSet>,
    curr: &IndicatorSet,
) -> Option<(f64, f64, f64, f64)> {
    let p = prev?;
    Some((p.ma_short?, p.ma_long?, curr.ma_short?, curr.ma_long?))
}

fn macd_inputs(prev: Option<&IndicatorSet>, curr: &IndicatorSet) -> Option<(f64, f64, f64, f64)> {
    let p = prev?;
    Some((p.macd?, p.macd_signal?, curr.macd?, curr.macd_signal?))
}
