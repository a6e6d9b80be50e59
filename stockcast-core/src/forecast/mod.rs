//! Forecast cascade — multi-day price forecasting with strategy fallback.
//!
//! Strategies are ordered by strength and tried in sequence: feature
//! regression (needs 80 bars) → ARIMA(1,1,1) (needs 60) → linear trend
//! (needs 5). Each stage's data-sufficiency precondition is checked before
//! any fitting; a failed fit inside a stage falls through to the next
//! stage, and only exhaustion of the final stage is surfaced to the caller.

pub mod arima;
pub mod cascade;
pub mod regression;
pub mod trend;

pub use arima::SeasonalArima;
pub use cascade::ForecastCascade;
pub use regression::FeatureRegression;
pub use trend::LinearTrend;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

use crate::domain::{ForecastMethod, PriceBar};

/// z-value for a two-sided 80% normal interval.
pub(crate) const Z_80: f64 = 1.2816;

/// Forecast-path errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("insufficient history: have {have} bars, need at least {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("all forecast strategies failed: {last_error}")]
    AllStrategiesFailed { last_error: String },
}

/// A single stage's fit failure. Caught by the cascade and recorded as a
/// diagnostic; never surfaced directly unless the final stage fails.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("singular system: {0}")]
    Singular(String),

    #[error("fit did not converge: {0}")]
    NonConvergence(String),

    #[error("degenerate input: {0}")]
    Degenerate(String),
}

/// One predicted step, before target dates are attached.
#[derive(Debug, Clone, Copy)]
pub struct PricePrediction {
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

impl PricePrediction {
    /// Construct with bounds forced into lower <= predicted <= upper order.
    pub(crate) fn ordered(predicted: f64, a: f64, b: f64) -> Self {
        Self {
            predicted,
            lower: a.min(b).min(predicted),
            upper: a.max(b).max(predicted),
        }
    }
}

/// A forecasting strategy: a precondition plus a fit/predict operation.
///
/// Strategies are pure and deterministic. Adding a fourth fallback is a
/// matter of implementing this trait and inserting it into the cascade's
/// ordered list.
pub trait ForecastStrategy: Send + Sync {
    /// Method name stamped on the forecast batch.
    fn method(&self) -> ForecastMethod;

    /// Minimum bar count required before this strategy may be attempted.
    fn min_bars(&self) -> usize;

    /// Confidence scalar carried by forecasts this strategy produces.
    fn confidence(&self) -> f64;

    /// Fit on the bar history and predict `horizon` future steps.
    ///
    /// Only called when `bars.len() >= min_bars()`.
    fn fit_predict(
        &self,
        bars: &[PriceBar],
        horizon: usize,
    ) -> Result<Vec<PricePrediction>, FitError>;
}

/// The next `n` business days strictly after `after` (weekend-skipping;
/// holiday calendars are the data source's concern).
pub(crate) fn next_business_days(after: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(n);
    let mut current = after;
    while days.len() < n {
        current += Duration::days(1);
        if current.weekday() != Weekday::Sat && current.weekday() != Weekday::Sun {
            days.push(current);
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_days_skip_weekends() {
        // 2024-06-06 is a Thursday.
        let after = NaiveDate::from_ymd_opt(2024, 6, 6).unwrap();
        let days = next_business_days(after, 3);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()); // Fri
        assert_eq!(days[1], NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()); // Mon
        assert_eq!(days[2], NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()); // Tue
    }

    #[test]
    fn ordered_prediction_repairs_bounds() {
        let p = PricePrediction::ordered(-10.0, -9.5, -10.5);
        assert!(p.lower <= p.predicted && p.predicted <= p.upper);
    }
}
