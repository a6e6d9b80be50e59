//! Pipeline configuration — TOML-loadable, with serde defaults so an
//! empty file yields the stock setup.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockcast_core::forecast::{
    FeatureRegression, ForecastCascade, LinearTrend, SeasonalArima,
};
use stockcast_core::indicators::{IndicatorConfig, IndicatorEngine};
use stockcast_core::report::ReportAssembler;
use stockcast_core::scoring::{ScoringConfig, SignalScorer};

/// Errors from loading or validating a pipeline config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Confidence and band settings for the forecast cascade stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub regression_confidence: f64,
    pub arima_confidence: f64,
    pub trend_confidence: f64,
    /// Flat fractional band around the linear-trend prediction.
    pub trend_band: f64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            regression_confidence: 0.8,
            arima_confidence: 0.7,
            trend_confidence: 0.5,
            trend_band: 0.05,
        }
    }
}

/// Full pipeline configuration for one forecast-and-report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Forecast horizon in trading days.
    pub horizon: usize,
    /// Indicator-completeness lookback for the data quality score.
    pub quality_lookback: usize,
    pub indicators: IndicatorConfig,
    pub scoring: ScoringConfig,
    pub cascade: CascadeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizon: 5,
            quality_lookback: 30,
            indicators: IndicatorConfig::default(),
            scoring: ScoringConfig::default(),
            cascade: CascadeConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::Invalid("horizon must be >= 1".into()));
        }
        if self.quality_lookback == 0 {
            return Err(ConfigError::Invalid("quality_lookback must be >= 1".into()));
        }
        if self.scoring.buy_threshold <= self.scoring.trim_threshold {
            return Err(ConfigError::Invalid(
                "scoring.buy_threshold must exceed scoring.trim_threshold".into(),
            ));
        }
        for (name, c) in [
            ("regression_confidence", self.cascade.regression_confidence),
            ("arima_confidence", self.cascade.arima_confidence),
            ("trend_confidence", self.cascade.trend_confidence),
        ] {
            if !(c > 0.0 && c <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "cascade.{name} must be in (0, 1], got {c}"
                )));
            }
        }
        if self.cascade.trend_band < 0.0 {
            return Err(ConfigError::Invalid(
                "cascade.trend_band must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Build the configured indicator engine.
    pub fn indicator_engine(&self) -> IndicatorEngine {
        IndicatorEngine::new(self.indicators.clone())
    }

    /// Build the configured signal scorer.
    pub fn scorer(&self) -> SignalScorer {
        SignalScorer::new(self.scoring.clone())
    }

    /// Build the configured forecast cascade, strongest stage first.
    pub fn cascade(&self) -> ForecastCascade {
        ForecastCascade::new(vec![
            Box::new(FeatureRegression::new(
                FeatureRegression::default_alpha_grid(),
                self.cascade.regression_confidence,
            )),
            Box::new(SeasonalArima::new(self.cascade.arima_confidence)),
            Box::new(LinearTrend::new(
                self.cascade.trend_band,
                self.cascade.trend_confidence,
            )),
        ])
    }

    /// Build the configured report assembler.
    pub fn assembler(&self) -> ReportAssembler {
        ReportAssembler::new(self.quality_lookback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_default_config() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.horizon, 5);
        assert_eq!(config.quality_lookback, 30);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            horizon = 10

            [scoring]
            buy_threshold = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.horizon, 10);
        assert_eq!(config.scoring.buy_threshold, 20.0);
        assert_eq!(config.scoring.trim_threshold, -15.0);
        assert_eq!(config.indicators.ma_long, 30);
    }

    #[test]
    fn zero_horizon_is_invalid() {
        let err = PipelineConfig::from_toml_str("horizon = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn out_of_range_confidence_is_invalid() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [cascade]
            arima_confidence = 1.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn inverted_thresholds_are_invalid() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [scoring]
            buy_threshold = -20.0
            trim_threshold = 20.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn garbage_toml_is_a_parse_error() {
        let err = PipelineConfig::from_toml_str("horizon = [not toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = PipelineConfig::default();
        let raw = toml::to_string(&config).unwrap();
        let back = PipelineConfig::from_toml_str(&raw).unwrap();
        assert_eq!(config, back);
    }
}
