//! StockCast CLI — run the forecast-and-report pipeline from the shell.
//!
//! Commands:
//! - `analyze` — run the pipeline for one symbol and print the report
//! - `universe` — run a list of symbols in parallel and print a summary line each
//!
//! Bars come from a CSV directory (`--csv-dir`, one `{symbol}.csv` per
//! symbol) or from the deterministic synthetic generator (`--synthetic`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use stockcast_core::data::PriceHistorySource;
use stockcast_runner::{
    run_symbol, run_universe, CsvHistorySource, MemoryReportStore, PipelineConfig, RunOutcome,
    SyntheticHistorySource,
};

#[derive(Parser)]
#[command(name = "stockcast", about = "StockCast — price forecasting and signal scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline for one symbol and print the full report.
    Analyze {
        /// Symbol to analyze (e.g., AAPL).
        symbol: String,

        #[command(flatten)]
        common: CommonOpts,

        /// Print the report as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the pipeline for several symbols in parallel.
    Universe {
        /// Symbols to analyze (e.g., AAPL MSFT NVDA).
        #[arg(required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        common: CommonOpts,
    },
}

#[derive(Args)]
struct CommonOpts {
    /// Directory of {symbol}.csv bar files.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Generate deterministic synthetic bars instead of reading CSV.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Analysis cutoff date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<String>,

    /// Path to a TOML pipeline config. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            symbol,
            common,
            json,
        } => analyze(&symbol, &common, json),
        Commands::Universe { symbols, common } => universe(&symbols, &common),
    }
}

fn analyze(symbol: &str, common: &CommonOpts, json: bool) -> Result<()> {
    let config = load_config(common)?;
    let source = build_source(common)?;
    let store = MemoryReportStore::new();
    let as_of = parse_as_of(common)?;
    let created_at = Utc::now().naive_utc();

    let outcome = run_symbol(source.as_ref(), &store, &config, symbol, as_of, created_at)
        .with_context(|| format!("pipeline failed for {symbol}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn universe(symbols: &[String], common: &CommonOpts) -> Result<()> {
    let config = load_config(common)?;
    let source = build_source(common)?;
    let store = MemoryReportStore::new();
    let as_of = parse_as_of(common)?;
    let created_at = Utc::now().naive_utc();

    let results = run_universe(source.as_ref(), &store, &config, symbols, as_of, created_at);

    let mut failed = 0usize;
    for (symbol, result) in &results {
        match result {
            Ok(outcome) => println!("{}", outcome.report.analysis_summary),
            Err(err) => {
                failed += 1;
                eprintln!("{symbol}: {err}");
            }
        }
    }
    println!(
        "{}/{} symbols analyzed, {} reports stored",
        results.len() - failed,
        results.len(),
        store.len()
    );
    if failed == results.len() {
        bail!("every symbol failed");
    }
    Ok(())
}

fn load_config(common: &CommonOpts) -> Result<PipelineConfig> {
    match &common.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn build_source(common: &CommonOpts) -> Result<Box<dyn PriceHistorySource>> {
    match (&common.csv_dir, common.synthetic) {
        (Some(_), true) => bail!("--csv-dir and --synthetic are mutually exclusive"),
        (Some(dir), false) => Ok(Box::new(CsvHistorySource::new(dir.clone()))),
        (None, true) => {
            // Two years of weekday bars before the cutoff.
            let start = parse_as_of(common)? - chrono::Duration::days(730);
            Ok(Box::new(SyntheticHistorySource::new(start)))
        }
        (None, false) => bail!("either --csv-dir or --synthetic is required"),
    }
}

fn parse_as_of(common: &CommonOpts) -> Result<NaiveDate> {
    match &common.as_of {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date '{raw}', expected YYYY-MM-DD")),
        None => Ok(Utc::now().date_naive()),
    }
}

fn print_outcome(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!("{} — report v{}", report.symbol, report.version);
    println!("  {}", report.analysis_summary);
    println!(
        "  quality {:.2}, confidence {:.2}, method {}",
        report.data_quality_score, report.prediction_confidence, report.forecast.method
    );
    for point in &report.forecast.points {
        println!(
            "  day {} ({}): {:.2}  [{:.2}, {:.2}]",
            point.day_offset,
            point.target_date,
            point.predicted_price,
            point.lower_bound,
            point.upper_bound
        );
    }
    if !outcome.forecast.diagnostics.is_empty() {
        println!("  notes:");
        for note in &outcome.forecast.diagnostics {
            println!("    - {note}");
        }
    }
}
