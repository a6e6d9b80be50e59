//! Criterion benchmarks for the pipeline hot paths.
//!
//! Benchmarks:
//! 1. Indicator engine over a full history
//! 2. Forecast cascade at each stage's data regime (regression / ARIMA /
//!    trend)
//! 3. End-to-end score + forecast for one symbol

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::NaiveDate;
use stockcast_core::domain::PriceBar;
use stockcast_core::forecast::ForecastCascade;
use stockcast_core::indicators::IndicatorEngine;
use stockcast_core::scoring::SignalScorer;

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let close_at = |i: usize| {
        let t = i as f64;
        let hash = (i as u64).wrapping_mul(2654435761) % 997;
        let noise = hash as f64 / 997.0 - 0.5;
        100.0 + t * 0.05 + (t * 0.31).sin() * 7.0 + noise * 2.0
    };
    (0..n)
        .map(|i| {
            let close = close_at(i);
            let pre_close = if i == 0 { close } else { close_at(i - 1) };
            PriceBar {
                symbol: "BENCH".into(),
                date: base_date + chrono::Duration::days(i as i64),
                open: pre_close,
                high: close.max(pre_close) + 1.5,
                low: close.min(pre_close) - 1.5,
                close,
                pre_close,
                volume: 1_000_000 + (i as u64 % 500_000),
                amount: close * 1_000_000.0,
            }
        })
        .collect()
}

fn bench_indicator_engine(c: &mut Criterion) {
    let engine = IndicatorEngine::default();
    let mut group = c.benchmark_group("indicator_engine");
    for n in [100usize, 500, 2000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| engine.compute(black_box(bars)))
        });
    }
    group.finish();
}

fn bench_forecast_cascade(c: &mut Criterion) {
    let cascade = ForecastCascade::standard();
    let mut group = c.benchmark_group("forecast_cascade");
    // 300 bars → feature regression; 70 → ARIMA; 20 → linear trend.
    for (label, n) in [("regression", 300usize), ("arima", 70), ("trend", 20)] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(label), &bars, |b, bars| {
            b.iter(|| cascade.forecast(black_box(bars), 5).unwrap())
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let bars = make_bars(300);
    let engine = IndicatorEngine::default();
    let scorer = SignalScorer::default();
    let cascade = ForecastCascade::standard();
    c.bench_function("score_and_forecast_300_bars", |b| {
        b.iter(|| {
            let sets = engine.compute(black_box(&bars));
            let signals = scorer.score_series(&sets);
            let forecast = cascade.forecast(&bars, 5).unwrap();
            (signals, forecast)
        })
    });
}

criterion_group!(
    benches,
    bench_indicator_engine,
    bench_forecast_cascade,
    bench_full_pipeline
);
criterion_main!(benches);
