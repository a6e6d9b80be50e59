//! In-memory report store with atomic latest-version flips.
//!
//! A single mutex over the whole map makes the version assignment and the
//! is_latest transition one atomic step: concurrent writers for the same
//! symbol serialize, and no reader interleaving can observe two latest
//! reports for one symbol.

use std::collections::HashMap;
use std::sync::Mutex;

use stockcast_core::domain::Report;
use stockcast_core::report::{ReportStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryReportStore {
    inner: Mutex<HashMap<String, Vec<Report>>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of report versions across all symbols.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .map(|map| map.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportStore for MemoryReportStore {
    fn write_report(&self, mut report: Report) -> Result<u32, StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let versions = map.entry(report.symbol.clone()).or_default();

        let version = versions.last().map(|r| r.version + 1).unwrap_or(1);
        for prior in versions.iter_mut() {
            prior.is_latest = false;
        }
        report.version = version;
        report.is_latest = true;
        versions.push(report);
        Ok(version)
    }

    fn latest(&self, symbol: &str) -> Result<Option<Report>, StoreError> {
        let map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .get(symbol)
            .and_then(|versions| versions.iter().find(|r| r.is_latest).cloned()))
    }

    fn history(&self, symbol: &str) -> Result<Vec<Report>, StoreError> {
        let map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(symbol).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use stockcast_core::domain::{
        ForecastMethod, ForecastSnapshot, PriceSnapshot, SignalAction, SignalSnapshot,
    };

    fn sample_report(symbol: &str) -> Report {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        Report {
            symbol: symbol.into(),
            version: 0,
            created_at: date.and_hms_opt(18, 0, 0).unwrap(),
            is_latest: true,
            fingerprint: "fp".into(),
            price: PriceSnapshot {
                date,
                close: 100.0,
                open: 99.0,
                high: 101.0,
                low: 98.0,
                volume: 1000,
                pct_chg: Some(0.5),
            },
            signal: SignalSnapshot {
                date,
                action: SignalAction::Hold,
                signal_score: 5.0,
                ma_short: Some(100.0),
                ma_long: Some(99.0),
                rsi: Some(52.0),
                macd: Some(0.1),
                partial: false,
            },
            forecast: ForecastSnapshot {
                method: ForecastMethod::LinearTrend,
                confidence: 0.5,
                points: vec![],
            },
            data_quality_score: 0.8,
            prediction_confidence: 0.5,
            analysis_summary: "test".into(),
        }
    }

    #[test]
    fn first_write_is_version_1() {
        let store = MemoryReportStore::new();
        let version = store.write_report(sample_report("AAPL")).unwrap();
        assert_eq!(version, 1);
        let latest = store.latest("AAPL").unwrap().unwrap();
        assert_eq!(latest.version, 1);
        assert!(latest.is_latest);
    }

    #[test]
    fn rewrite_increments_and_flips_latest() {
        let store = MemoryReportStore::new();
        store.write_report(sample_report("AAPL")).unwrap();
        let v2 = store.write_report(sample_report("AAPL")).unwrap();
        assert_eq!(v2, 2);

        let history = store.history("AAPL").unwrap();
        assert_eq!(history.len(), 2);
        assert!(!history[0].is_latest);
        assert!(history[1].is_latest);
        assert_eq!(history[1].version, 2);
    }

    #[test]
    fn symbols_version_independently() {
        let store = MemoryReportStore::new();
        store.write_report(sample_report("AAPL")).unwrap();
        store.write_report(sample_report("AAPL")).unwrap();
        let v = store.write_report(sample_report("MSFT")).unwrap();
        assert_eq!(v, 1);
    }

    #[test]
    fn latest_for_unknown_symbol_is_none() {
        let store = MemoryReportStore::new();
        assert!(store.latest("NOPE").unwrap().is_none());
    }

    #[test]
    fn exactly_one_latest_under_concurrent_writers() {
        let store = Arc::new(MemoryReportStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..10 {
                    store.write_report(sample_report("RACE")).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let history = store.history("RACE").unwrap();
        assert_eq!(history.len(), 80);
        // Versions are a strict 1..=80 sequence.
        for (i, report) in history.iter().enumerate() {
            assert_eq!(report.version, i as u32 + 1);
        }
        // Exactly one latest, and it's the newest version.
        let latest_count = history.iter().filter(|r| r.is_latest).count();
        assert_eq!(latest_count, 1);
        assert!(history.last().unwrap().is_latest);
    }
}
