//! Microbenchmarks for the `push_sample()` hot path and decimated reads.
//!
//! Run with: `cargo bench -p strata -- push`

#![allow(missing_docs, clippy::cast_precision_loss)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use strata::{DenseConfig, DenseSeries, DisplaySample};

/// Creates a series preloaded with a sine-flavored ramp.
fn setup_series(sample_count: usize) -> DenseSeries {
    let series = DenseSeries::new(DenseConfig::new(0.0, 0.001)).unwrap();
    let values: Vec<f64> = (0..sample_count)
        .map(|i| (i as f64 * 0.01).sin() + i as f64 * 1e-6)
        .collect();
    series.push_samples(&values).unwrap();
    series
}

fn bench_push_single(c: &mut Criterion) {
    let series = DenseSeries::new(DenseConfig::new(0.0, 0.001)).unwrap();

    c.bench_function("push/single", |b| {
        b.iter(|| {
            series.push_sample(black_box(42.5)).unwrap();
        });
    });
}

fn bench_push_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("push/batch_size");

    for size in [16usize, 256, 4096] {
        let series = DenseSeries::new(DenseConfig::new(0.0, 0.001)).unwrap();
        let values: Vec<f64> = (0..size).map(|i| i as f64).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                series.push_samples(black_box(&values)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_get_samples_by_width(c: &mut Criterion) {
    let series = setup_series(1 << 20);
    let mut group = c.benchmark_group("get_samples/bin_width");

    // A full-span query at each zoom. Cost should stay flat as the bin
    // width grows because coarse levels answer coarse requests.
    for stride in [1usize, 64, 4096] {
        let bin_width = 0.001 * stride as f64;
        let mut out = vec![DisplaySample::default(); 2048];

        group.bench_with_input(BenchmarkId::from_parameter(stride), &stride, |b, _| {
            b.iter(|| {
                let written = series
                    .get_samples(black_box(0.0), black_box(bin_width), &mut out)
                    .unwrap();
                black_box(written);
            });
        });
    }

    group.finish();
}

fn bench_get_sample_point(c: &mut Criterion) {
    let series = setup_series(1 << 20);

    c.bench_function("get_sample/unaligned_window", |b| {
        b.iter(|| {
            let sample = series
                .get_sample(black_box(317.777), black_box(0.128))
                .unwrap();
            black_box(sample);
        });
    });
}

criterion_group!(
    benches,
    bench_push_single,
    bench_push_batch,
    bench_get_samples_by_width,
    bench_get_sample_point,
);
criterion_main!(benches);
