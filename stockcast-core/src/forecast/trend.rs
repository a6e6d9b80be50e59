//! Linear-trend fallback — the weakest, always-available strategy.
//!
//! trend = (close[-1] - close[-5]) / 5; prediction k steps out is
//! last_close + k * trend with a flat ±5% band, not a residual-based
//! interval.

use crate::domain::{ForecastMethod, PriceBar};

use super::{FitError, ForecastStrategy, PricePrediction};

#[derive(Debug, Clone)]
pub struct LinearTrend {
    band: f64,
    confidence: f64,
}

impl LinearTrend {
    pub fn new(band: f64, confidence: f64) -> Self {
        assert!(band >= 0.0, "band must be non-negative");
        assert!(
            confidence > 0.0 && confidence <= 1.0,
            "confidence must be in (0, 1]"
        );
        Self { band, confidence }
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::new(0.05, 0.5)
    }
}

impl ForecastStrategy for LinearTrend {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::LinearTrend
    }

    fn min_bars(&self) -> usize {
        5
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn fit_predict(
        &self,
        bars: &[PriceBar],
        horizon: usize,
    ) -> Result<Vec<PricePrediction>, FitError> {
        let n = bars.len();
        let last = bars[n - 1].close;
        let anchor = bars[n - 5].close;
        if !last.is_finite() || !anchor.is_finite() {
            return Err(FitError::Degenerate(
                "non-finite close in trend window".into(),
            ));
        }

        let trend = (last - anchor) / 5.0;
        Ok((1..=horizon)
            .map(|k| {
                let predicted = last + k as f64 * trend;
                PricePrediction::ordered(
                    predicted,
                    predicted * (1.0 - self.band),
                    predicted * (1.0 + self.band),
                )
            })
            .collect())
    }
}
