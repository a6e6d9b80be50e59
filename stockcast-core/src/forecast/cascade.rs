//! The ordered strategy cascade.
//!
//! Strategies are tried strictly in list order. A stage is skipped (with a
//! diagnostic) when its minimum-history precondition fails, and a fit
//! failure inside a stage likewise falls through with a diagnostic. Only
//! when every eligible stage has failed — the linear trend included — does
//! the cascade surface an error.

use crate::domain::{Forecast, ForecastPoint, PriceBar};

use super::{
    next_business_days, FeatureRegression, ForecastError, ForecastStrategy, LinearTrend,
    SeasonalArima,
};

pub struct ForecastCascade {
    strategies: Vec<Box<dyn ForecastStrategy>>,
}

impl ForecastCascade {
    /// The production cascade: regression → ARIMA → linear trend.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(FeatureRegression::default()),
            Box::new(SeasonalArima::default()),
            Box::new(LinearTrend::default()),
        ])
    }

    pub fn new(strategies: Vec<Box<dyn ForecastStrategy>>) -> Self {
        assert!(!strategies.is_empty(), "cascade needs at least one strategy");
        Self { strategies }
    }

    /// Produce an N-day forecast from the bar history.
    ///
    /// Fails with `InsufficientHistory` when no stage's precondition holds
    /// (never a partial result), or `AllStrategiesFailed` when every
    /// eligible stage's fit failed.
    pub fn forecast(&self, bars: &[PriceBar], horizon: usize) -> Result<Forecast, ForecastError> {
        assert!(horizon >= 1, "forecast horizon must be >= 1");

        let have = bars.len();
        let floor = self
            .strategies
            .iter()
            .map(|s| s.min_bars())
            .min()
            .unwrap_or(usize::MAX);
        if have < floor {
            return Err(ForecastError::InsufficientHistory { have, need: floor });
        }

        let mut diagnostics = Vec::new();
        let mut last_error = String::new();

        for strategy in &self.strategies {
            let method = strategy.method();
            if have < strategy.min_bars() {
                diagnostics.push(format!(
                    "{method} skipped: needs {} bars, have {have}",
                    strategy.min_bars()
                ));
                continue;
            }

            match strategy.fit_predict(bars, horizon) {
                Ok(steps) => {
                    let last_date = bars[have - 1].date;
                    let dates = next_business_days(last_date, horizon);
                    let points = steps
                        .iter()
                        .zip(dates)
                        .enumerate()
                        .map(|(i, (step, target_date))| ForecastPoint {
                            target_date,
                            day_offset: i as u32 + 1,
                            predicted_price: step.predicted,
                            lower_bound: step.lower,
                            upper_bound: step.upper,
                        })
                        .collect();
                    return Ok(Forecast {
                        method,
                        confidence: strategy.confidence(),
                        points,
                        diagnostics,
                    });
                }
                Err(err) => {
                    last_error = format!("{method}: {err}");
                    diagnostics.push(format!("{method} failed: {err}"));
                }
            }
        }

        Err(ForecastError::AllStrategiesFailed { last_error })
    }
}
