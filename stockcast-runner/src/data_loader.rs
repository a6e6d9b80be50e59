//! Price-history sources for the runner.
//!
//! Two `PriceHistorySource` implementations:
//! - `CsvHistorySource` reads one `{symbol}.csv` file per symbol from a
//!   directory.
//! - `SyntheticHistorySource` generates a deterministic random walk,
//!   seeded per symbol, for development and tests. Synthetic bars are
//!   clearly fake; nothing tags them as market data.

use std::path::PathBuf;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use stockcast_core::data::{validate_history, HistoryError, PriceHistorySource};
use stockcast_core::domain::PriceBar;

/// CSV row layout: one bar per line, header required.
#[derive(Debug, Deserialize)]
struct CsvBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    pre_close: f64,
    volume: u64,
    amount: f64,
}

/// Reads bars from `{dir}/{symbol}.csv`.
#[derive(Debug, Clone)]
pub struct CsvHistorySource {
    dir: PathBuf,
}

impl CsvHistorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PriceHistorySource for CsvHistorySource {
    fn name(&self) -> &str {
        "csv"
    }

    fn read_history(&self, symbol: &str, as_of: NaiveDate) -> Result<Vec<PriceBar>, HistoryError> {
        let path = self.dir.join(format!("{symbol}.csv"));
        if !path.exists() {
            return Err(HistoryError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| HistoryError::Io(format!("{}: {e}", path.display())))?;

        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvBar>() {
            let row = row.map_err(|e| HistoryError::Malformed(format!("{symbol}: {e}")))?;
            if row.date > as_of {
                continue;
            }
            bars.push(PriceBar {
                symbol: symbol.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                pre_close: row.pre_close,
                volume: row.volume,
                amount: row.amount,
            });
        }

        validate_history(symbol, &bars)?;
        Ok(bars)
    }
}

/// Deterministic synthetic random-walk bars, seeded per symbol.
#[derive(Debug, Clone)]
pub struct SyntheticHistorySource {
    start: NaiveDate,
}

impl SyntheticHistorySource {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }
}

impl PriceHistorySource for SyntheticHistorySource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn read_history(&self, symbol: &str, as_of: NaiveDate) -> Result<Vec<PriceBar>, HistoryError> {
        Ok(generate_synthetic_bars(symbol, self.start, as_of))
    }
}

/// Generate a random walk from a starting price of 100.0, weekdays only.
///
/// The seed derives from the symbol name alone, so the same symbol always
/// produces the same bars regardless of call order or thread count.
fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if current.weekday() == Weekday::Sat || current.weekday() == Weekday::Sun {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let pre_close = price;
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(PriceBar {
            symbol: symbol.to_string(),
            date: current,
            open,
            high,
            low,
            close,
            pre_close,
            volume,
            amount: close * volume as f64,
        });

        price = close;
        current += Duration::days(1);
    }

    bars
}
