//! CLI for the strata multi-resolution time-series store.
//!
//! Provides commands for generating synthetic signals, streaming live data
//! through a shared series, and benchmarking the write path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use strata::{DenseConfig, DenseSeries, DisplaySample, sampler};

/// strata — Embedded multi-resolution time-series store CLI.
#[derive(Parser)]
#[command(name = "strata", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic signal and print a decimated window.
    Synth {
        /// Number of raw samples to generate.
        #[arg(long, default_value = "1000000")]
        samples: usize,

        /// Seconds between consecutive samples.
        #[arg(long, default_value = "0.001")]
        interval: f64,

        /// Width of each output bin in seconds.
        #[arg(long, default_value = "1.0")]
        bin_width: f64,

        /// Maximum number of output bins.
        #[arg(long, default_value = "100")]
        columns: usize,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Stream live data from producer threads while a consumer polls.
    Stream {
        /// Number of producer threads.
        #[arg(long, default_value = "2")]
        producers: usize,

        /// Total number of samples to push across all producers.
        #[arg(long, default_value = "500000")]
        samples: usize,

        /// How often the consumer polls the series, in milliseconds.
        #[arg(long, default_value = "100")]
        poll_ms: u64,
    },

    /// Run a write-path microbenchmark.
    Bench {
        /// Number of samples to push.
        #[arg(long, default_value = "10000000")]
        samples: usize,

        /// Size of each push batch (1 = single-sample pushes).
        #[arg(long, default_value = "1")]
        batch: usize,
    },
}

/// Output format for decimated windows.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array of objects.
    Json,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Synth {
            samples,
            interval,
            bin_width,
            columns,
            format,
        } => cmd_synth(samples, interval, bin_width, columns, &format),
        Commands::Stream {
            producers,
            samples,
            poll_ms,
        } => cmd_stream(producers, samples, poll_ms),
        Commands::Bench { samples, batch } => cmd_bench(samples, batch),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Implements `strata synth`.
#[allow(clippy::cast_precision_loss)] // sample indices are display-scale
fn cmd_synth(
    samples: usize,
    interval: f64,
    bin_width: f64,
    columns: usize,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let series = DenseSeries::new(DenseConfig::new(0.0, interval))?;

    // A slow sine carrying a fast ripple, so both envelope and detail are
    // visible at any zoom.
    let values: Vec<f64> = (0..samples)
        .map(|i| {
            let t = i as f64 * interval;
            (t * 0.5).sin() * 10.0 + (t * 200.0).sin()
        })
        .collect();
    series.push_samples(&values)?;

    let (start, end) = series.get_span();
    tracing::info!(samples, start, end, "synthesized series");

    let mut out = vec![DisplaySample::default(); columns];
    let written = series.get_samples(start, bin_width, &mut out)?;
    print_window(&out[..written], format)?;

    Ok(())
}

/// Implements `strata stream`.
fn cmd_stream(
    producers: usize,
    samples: usize,
    poll_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    if producers == 0 {
        return Err("at least one producer is required".into());
    }

    let series = Arc::new(DenseSeries::new(DenseConfig::new(0.0, 0.0001))?);

    // Partition the workload into one contiguous slice per producer. Pushes
    // interleave freely; each producer just owns its sample budget.
    let partitions = sampler::sample(producers, 0, samples);
    tracing::info!(producers, samples, ?partitions, "starting producers");

    let mut workers = Vec::with_capacity(partitions.len());
    for (worker, (begin, end)) in partitions.into_iter().enumerate() {
        let series = Arc::clone(&series);
        workers.push(std::thread::spawn(move || {
            #[allow(clippy::cast_precision_loss)]
            for i in begin..end {
                let value = (i as f64 * 0.001).sin() * 5.0;
                if let Err(e) = series.push_sample(value) {
                    tracing::error!(worker, error = %e, "push failed");
                    return;
                }
            }
            tracing::info!(worker, pushed = end - begin, "producer done");
        }));
    }

    let consumer = {
        let series = Arc::clone(&series);
        std::thread::spawn(move || {
            let mut out = vec![DisplaySample::default(); 80];
            while series.sample_count() < samples {
                let (start, end) = series.get_span();
                let width = ((end - start) / 80.0).max(0.0001);
                match series.get_samples(start, width, &mut out) {
                    Ok(written) => {
                        tracing::info!(
                            count = series.sample_count(),
                            span_end = end,
                            columns = written,
                            "consumer poll"
                        );
                    }
                    Err(e) => tracing::error!(error = %e, "poll failed"),
                }
                std::thread::sleep(Duration::from_millis(poll_ms));
            }
        })
    };

    for worker in workers {
        worker.join().map_err(|_| "producer panicked")?;
    }
    consumer.join().map_err(|_| "consumer panicked")?;

    let (start, end) = series.get_span();
    println!("Streamed {} samples over span [{start}, {end}]", series.sample_count());

    Ok(())
}

/// Implements `strata bench`.
#[allow(clippy::cast_precision_loss)] // benchmark stats are fine with f64 precision
fn cmd_bench(samples: usize, batch: usize) -> Result<(), Box<dyn std::error::Error>> {
    if batch == 0 {
        return Err("batch size must be at least 1".into());
    }

    println!("strata write-path benchmark");
    println!("  Samples: {samples}");
    println!("  Batch size: {batch}");
    println!();

    let series = DenseSeries::new(DenseConfig::new(0.0, 0.001))?;

    let start = Instant::now();
    if batch == 1 {
        for i in 0..samples {
            series.push_sample(i as f64)?;
        }
    } else {
        let chunk: Vec<f64> = (0..batch).map(|i| i as f64).collect();
        let mut remaining = samples;
        while remaining > 0 {
            let take = remaining.min(batch);
            series.push_samples(&chunk[..take])?;
            remaining -= take;
        }
    }
    let elapsed = start.elapsed();

    let ns_per_push = elapsed.as_nanos() as f64 / samples as f64;
    let pushes_per_sec = samples as f64 / elapsed.as_secs_f64();

    println!("Results:");
    println!("  Total pushes: {samples}");
    println!("  Elapsed: {elapsed:.3?}");
    println!("  Avg latency: {ns_per_push:.1} ns/push");
    println!("  Throughput: {pushes_per_sec:.0} pushes/sec");

    // A full-span coarse read should stay cheap no matter the history size.
    let mut out = vec![DisplaySample::default(); 100];
    let (span_start, span_end) = series.get_span();
    let width = ((span_end - span_start) / 100.0).max(0.001);
    let read_start = Instant::now();
    let written = series.get_samples(span_start, width, &mut out)?;
    let read_elapsed = read_start.elapsed();
    println!("  Full-span read: {written} columns in {read_elapsed:.3?}");

    Ok(())
}

/// Prints a decimated window in the requested format.
fn print_window(
    window: &[DisplaySample],
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => {
            println!("timestamp,min,max,average");
            for sample in window {
                println!(
                    "{},{},{},{}",
                    sample.timestamp, sample.min, sample.max, sample.average
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "count": window.len(),
                "data": window,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
