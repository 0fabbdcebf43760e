//! Criterion benchmarks for the deep-dive hot paths.
//!
//! Benchmarks:
//! 1. Indicator batch (RSI, MACD, Bollinger) over growing histories
//! 2. Full technical analysis (indicators + snapshot + classification)
//! 3. Black-Scholes Greeks for a synthetic chain

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use optdash_core::analysis::{analyze, IndicatorSet, RsiThresholds};
use optdash_core::data::{MarketDataProvider, SyntheticProvider};
use optdash_core::domain::{OptionSide, PriceBar};
use optdash_core::greeks::enrich_chain;

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_set");
    for n in [252usize, 1_260, 5_040] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::new("standard", n), &bars, |b, bars| {
            b.iter(|| IndicatorSet::standard(black_box(bars)))
        });
    }
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let bars = make_bars(252);
    let thresholds = RsiThresholds::default();
    c.bench_function("analyze_one_year", |b| {
        b.iter(|| analyze(black_box(&bars), &thresholds))
    });
}

fn bench_greeks(c: &mut Criterion) {
    let as_of = chrono::NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let provider = SyntheticProvider::new(as_of);
    let expiry = provider.expiries("RELIANCE.NS").unwrap()[0];
    let chain = provider.chain("RELIANCE.NS", expiry).unwrap();
    let spot = provider.quote("RELIANCE.NS").unwrap().price;
    c.bench_function("greeks_chain", |b| {
        b.iter(|| enrich_chain(black_box(&chain), OptionSide::Call, spot, 0.07, as_of))
    });
}

criterion_group!(benches, bench_indicators, bench_analyze, bench_greeks);
criterion_main!(benches);
