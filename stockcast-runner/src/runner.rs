//! The per-symbol pipeline run and the universe fan-out.
//!
//! One run is pure sequential compute: read history → indicators → score →
//! forecast cascade → assemble → store. Across symbols the runs are
//! embarrassingly parallel; `run_universe` fans them out on rayon with no
//! shared mutable state beyond the store's own lock.

use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use thiserror::Error;

use stockcast_core::data::{HistoryError, PriceHistorySource};
use stockcast_core::domain::{Forecast, PriceBar, Report, Signal};
use stockcast_core::forecast::ForecastError;
use stockcast_core::report::{AssembleError, ReportStore, StoreError};

use crate::config::PipelineConfig;

/// Errors from a single pipeline run.
///
/// `History(SymbolNotFound)` and `NoData` mean "no data yet"; the other
/// variants mean the computation itself failed. Callers render the two
/// differently.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no price data for '{symbol}' as of {as_of}")]
    NoData { symbol: String, as_of: NaiveDate },

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything one run produced, with the store-assigned version.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub symbol: String,
    pub version: u32,
    pub signal: Signal,
    pub forecast: Forecast,
    pub report: Report,
}

/// Deterministic hash over (config, bars): identical inputs give
/// identical fingerprints, so idempotent reruns are visible in the store.
pub fn input_fingerprint(config: &PipelineConfig, bars: &[PriceBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    let config_json =
        serde_json::to_vec(config).expect("PipelineConfig serialization failed");
    hasher.update(&config_json);
    for bar in bars {
        let bar_json = serde_json::to_vec(bar).expect("PriceBar serialization failed");
        hasher.update(&bar_json);
    }
    hasher.finalize().to_hex().to_string()
}

/// Run the full pipeline for one symbol and persist the report.
pub fn run_symbol(
    source: &dyn PriceHistorySource,
    store: &dyn ReportStore,
    config: &PipelineConfig,
    symbol: &str,
    as_of: NaiveDate,
    created_at: NaiveDateTime,
) -> Result<RunOutcome, RunError> {
    let bars = source.read_history(symbol, as_of)?;
    if bars.is_empty() {
        return Err(RunError::NoData {
            symbol: symbol.to_string(),
            as_of,
        });
    }

    let sets = config.indicator_engine().compute(&bars);
    let signals = config.scorer().score_series(&sets);
    let forecast = config.cascade().forecast(&bars, config.horizon)?;

    let fingerprint = input_fingerprint(config, &bars);
    let mut report = config.assembler().assemble(
        symbol,
        &bars,
        &sets,
        &signals,
        &forecast,
        created_at,
        fingerprint,
    )?;

    let version = store.write_report(report.clone())?;
    report.version = version;

    // Non-empty bars guarantee a latest signal; assemble would have
    // errored otherwise.
    let signal = signals.into_iter().next_back().ok_or(AssembleError::NoSignal)?;

    Ok(RunOutcome {
        symbol: symbol.to_string(),
        version,
        signal,
        forecast,
        report,
    })
}

/// Run the pipeline for every symbol in parallel.
///
/// Each symbol's result is independent; one failure never aborts the
/// others. Results come back in input order.
pub fn run_universe(
    source: &dyn PriceHistorySource,
    store: &dyn ReportStore,
    config: &PipelineConfig,
    symbols: &[String],
    as_of: NaiveDate,
    created_at: NaiveDateTime,
) -> Vec<(String, Result<RunOutcome, RunError>)> {
    symbols
        .par_iter()
        .map(|symbol| {
            let result = run_symbol(source, store, config, symbol, as_of, created_at);
            (symbol.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::SyntheticHistorySource;
    use crate::store::MemoryReportStore;

    fn dates() -> (NaiveDate, NaiveDateTime) {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        (as_of, as_of.and_hms_opt(18, 0, 0).unwrap())
    }

    #[test]
    fn fingerprint_is_deterministic_and_input_sensitive() {
        let source = SyntheticHistorySource::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let (as_of, _) = dates();
        let bars = source.read_history("FP", as_of).unwrap();
        let config = PipelineConfig::default();

        let a = input_fingerprint(&config, &bars);
        let b = input_fingerprint(&config, &bars);
        assert_eq!(a, b);

        let mut other_config = config.clone();
        other_config.horizon = 10;
        assert_ne!(a, input_fingerprint(&other_config, &bars));

        let shorter = &bars[..bars.len() - 1];
        assert_ne!(a, input_fingerprint(&config, shorter));
    }

    #[test]
    fn missing_symbol_maps_to_history_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = crate::data_loader::CsvHistorySource::new(dir.path());
        let store = MemoryReportStore::new();
        let (as_of, created_at) = dates();
        let err = run_symbol(
            &source,
            &store,
            &PipelineConfig::default(),
            "NOPE",
            as_of,
            created_at,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RunError::History(HistoryError::SymbolNotFound { .. })
        ));
    }
}
