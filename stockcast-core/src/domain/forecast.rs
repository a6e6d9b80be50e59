//! Forecast — multi-day price predictions with confidence bounds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which cascade stage produced a forecast batch.
///
/// Exactly one method is stamped per forecast run; all points in the run
/// share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    FeatureRegression,
    SeasonalArima,
    LinearTrend,
}

impl ForecastMethod {
    /// Wire name used in snapshots (`feature_regression` etc).
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::FeatureRegression => "feature_regression",
            ForecastMethod::SeasonalArima => "seasonal_arima",
            ForecastMethod::LinearTrend => "linear_trend",
        }
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One predicted future trading day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub target_date: NaiveDate,
    /// 1-indexed offset into the future from the last known trading date.
    pub day_offset: u32,
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastPoint {
    /// The bound-ordering invariant every point must satisfy.
    pub fn bounds_ordered(&self) -> bool {
        self.lower_bound <= self.predicted_price && self.predicted_price <= self.upper_bound
    }
}

/// A full forecast run: N points, one method, one confidence scalar.
///
/// `diagnostics` records stage skips and recovered fit failures from the
/// cascade — degraded-path context for the caller, not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub method: ForecastMethod,
    /// In (0, 1]; fixed per strategy, weaker fallbacks carry less.
    pub confidence: f64,
    pub points: Vec<ForecastPoint>,
    pub diagnostics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_wire_names() {
        assert_eq!(ForecastMethod::FeatureRegression.as_str(), "feature_regression");
        assert_eq!(ForecastMethod::SeasonalArima.as_str(), "seasonal_arima");
        assert_eq!(ForecastMethod::LinearTrend.as_str(), "linear_trend");
    }

    #[test]
    fn method_serde_roundtrip() {
        let json = serde_json::to_string(&ForecastMethod::SeasonalArima).unwrap();
        assert_eq!(json, "\"seasonal_arima\"");
        let back: ForecastMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ForecastMethod::SeasonalArima);
    }

    #[test]
    fn bounds_ordering_check() {
        let point = ForecastPoint {
            target_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            day_offset: 1,
            predicted_price: 100.0,
            lower_bound: 95.0,
            upper_bound: 105.0,
        };
        assert!(point.bounds_ordered());

        let bad = ForecastPoint {
            lower_bound: 101.0,
            ..point
        };
        assert!(!bad.bounds_ordered());
    }
}
