//! Benchmarks for the series transform.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pulse_core::traits::Indicator;
use pulse_core::types::{RawObservation, RawSeries};
use pulse_indicators::{transform, Sma};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn generate_series(size: usize) -> RawSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let observations = generate_test_data(size)
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let mut obs =
                RawObservation::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1e6);
            // Every 50th day arrives incomplete.
            if i % 50 == 0 {
                obs.volume = None;
            }
            obs
        })
        .collect();
    RawSeries::new("BENCH", observations)
}

fn benchmark_sma(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMA");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("aligned", size), &data, |b, data| {
            let sma = Sma::new(20);
            b.iter(|| sma.aligned(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for size in [250, 2500, 25000].iter() {
        let series = generate_series(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            b.iter(|| transform(black_box(series)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sma, benchmark_transform);
criterion_main!(benches);
