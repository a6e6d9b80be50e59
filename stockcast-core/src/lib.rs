//! StockCast Core — the forecasting and signal-scoring pipeline.
//!
//! This crate contains the compute heart of the system:
//! - Domain types (price bars, signals, forecasts, reports)
//! - Indicator engine (moving averages, RSI, MACD)
//! - Signal scorer (bounded score + BUY/HOLD/TRIM action)
//! - Feature builder (lagged/rolling feature matrix + recursive rolling window)
//! - Forecast cascade (feature regression → ARIMA → linear trend)
//! - Report assembler (versioned snapshot records)
//!
//! Everything here is pure compute over an in-memory bar window. The two
//! collaborator seams — where price history comes from and where reports
//! go — are the `PriceHistorySource` and `ReportStore` traits.

pub mod data;
pub mod domain;
pub mod features;
pub mod forecast;
pub mod indicators;
pub mod report;
pub mod scoring;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline types are Send + Sync.
    ///
    /// The runner fans the pipeline out across symbols on a thread pool,
    /// so every type that crosses that boundary must be thread-safe.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::Forecast>();
        require_sync::<domain::Forecast>();
        require_send::<domain::Report>();
        require_sync::<domain::Report>();

        require_send::<indicators::IndicatorSet>();
        require_sync::<indicators::IndicatorSet>();
        require_send::<scoring::SignalScorer>();
        require_sync::<scoring::SignalScorer>();
        require_send::<forecast::ForecastCascade>();
        require_sync::<forecast::ForecastCascade>();
        require_send::<report::ReportAssembler>();
        require_sync::<report::ReportAssembler>();
    }
}
