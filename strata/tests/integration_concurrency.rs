//! Integration tests for shared-series access from multiple threads.

use std::sync::Arc;
use std::thread;

use strata::{DenseConfig, DenseSeries, DisplaySample, SeriesRegistry, TimeSeries};

#[test]
fn test_concurrent_producer_and_consumer() {
    let series = Arc::new(DenseSeries::new(DenseConfig::new(0.0, 0.001)).unwrap());
    let total = 50_000usize;

    let producer = {
        let series = Arc::clone(&series);
        thread::spawn(move || {
            for i in 0..total {
                #[allow(clippy::cast_precision_loss)]
                series.push_sample(i as f64).unwrap();
            }
        })
    };

    // Consumer polls like a render loop: every read must see a consistent
    // snapshot (monotonic span, min <= average <= max in every column).
    let consumer = {
        let series = Arc::clone(&series);
        thread::spawn(move || {
            let mut out = vec![DisplaySample::default(); 256];
            let mut last_end = f64::NEG_INFINITY;
            for _ in 0..200 {
                let (start, end) = series.get_span();
                assert!(end >= start);
                assert!(end >= last_end, "span end went backwards");
                last_end = end;

                let written = series.get_samples(start, 0.064, &mut out).unwrap();
                for sample in &out[..written] {
                    assert!(sample.min <= sample.average + 1e-9);
                    assert!(sample.average <= sample.max + 1e-9);
                }
                thread::yield_now();
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();

    // Final state: every sample arrived exactly once, in order.
    let (start, end) = series.get_span();
    assert_eq!(start, 0.0);
    assert!((end - 0.001 * 49_999.0).abs() < 1e-9);

    // Query the tail through a 64-sample bin; the ramp makes its contents
    // exact: raw indices 49_984..=49_999.
    let last = series.get_sample(end, 0.064).unwrap();
    assert_eq!(last.min, 49_984.0);
    assert_eq!(last.max, 49_999.0);
}

#[test]
fn test_multiple_producers_on_distinct_series() {
    let mut registry = SeriesRegistry::new();
    let left = registry
        .register_dense("audio.left", DenseConfig::new(0.0, 0.01))
        .unwrap();
    let right = registry
        .register_dense("audio.right", DenseConfig::new(0.0, 0.01))
        .unwrap();

    let spawn_producer = |series: Arc<DenseSeries>, offset: f64| {
        thread::spawn(move || {
            for i in 0..10_000 {
                series.push_sample(f64::from(i) + offset).unwrap();
            }
        })
    };

    let a = spawn_producer(Arc::clone(&left), 0.0);
    let b = spawn_producer(Arc::clone(&right), 0.5);
    a.join().unwrap();
    b.join().unwrap();

    for (name, offset) in [("audio.left", 0.0), ("audio.right", 0.5)] {
        let series = registry.get(name).unwrap();
        let (_, end) = series.get_span();
        assert!((end - 0.01 * 9_999.0).abs() < 1e-9, "{name}");

        let first = series.get_sample(0.0, 0.01).unwrap();
        assert_eq!(first.average, offset, "{name}");
    }
}

#[test]
fn test_batched_and_single_pushes_interleave_cleanly() {
    let series = Arc::new(DenseSeries::new(DenseConfig::new(0.0, 1.0)).unwrap());

    // Two producers feed the same series; each push lands atomically in
    // lock-acquisition order, so the total count is exact even though the
    // interleaving is arbitrary.
    let batcher = {
        let series = Arc::clone(&series);
        thread::spawn(move || {
            let chunk = [1.0f64; 100];
            for _ in 0..100 {
                series.push_samples(&chunk).unwrap();
            }
        })
    };
    let single = {
        let series = Arc::clone(&series);
        thread::spawn(move || {
            for _ in 0..10_000 {
                series.push_sample(1.0).unwrap();
            }
        })
    };

    batcher.join().unwrap();
    single.join().unwrap();

    assert_eq!(series.sample_count(), 20_000);
    let (start, end) = series.get_span();
    assert_eq!(start, 0.0);
    assert_eq!(end, 19_999.0);

    // All values are 1.0, so every aggregate is exactly 1.0 at any width.
    let mut out = vec![DisplaySample::default(); 64];
    let written = series.get_samples(0.0, 1024.0, &mut out).unwrap();
    assert!(written > 0);
    for sample in &out[..written] {
        assert_eq!(sample.min, 1.0);
        assert_eq!(sample.max, 1.0);
        assert_eq!(sample.average, 1.0);
    }
}
