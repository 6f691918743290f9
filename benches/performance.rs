//! Performance benchmarks for the frame latency analyzer
//!
//! Covers the per-file and per-dataset hot paths: filename parsing, outlier
//! filtering, summary statistics, binning and a full directory scan.

use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use frame_latency_analyzer::{
    cli::Cli,
    config::ConfigParser,
    filter_outliers, scan_directory, Histogram, LatencyFilenameParser, LatencySummary,
};
use std::fs::File;
use std::hint::black_box;
use tempfile::TempDir;

/// Latencies shaped like a real capture: a tight cluster plus rare spikes
fn create_sample_latencies(count: usize) -> Vec<u64> {
    (0..count)
        .map(|i| if i % 97 == 0 { 400 + (i % 300) as u64 } else { 30 + (i % 17) as u64 })
        .collect()
}

fn create_sample_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "2024.03.05_14.{:02}.{:02}.{:03}_HW_{}_{}ms.jpg",
                (i / 60_000) % 60,
                (i / 1000) % 60,
                i % 1000,
                16_000_000 + i * 33_000,
                30 + i % 17
            )
        })
        .collect()
}

fn benchmark_filename_parsing(c: &mut Criterion) {
    let parser = LatencyFilenameParser::new().unwrap();
    let names = create_sample_names(1000);

    let mut group = c.benchmark_group("filename_parsing");
    group.bench_function("extract_latency", |b| {
        b.iter(|| {
            for name in &names {
                black_box(parser.extract_latency(black_box(name)));
            }
        })
    });
    group.bench_function("parse_sample_with_metadata", |b| {
        b.iter(|| {
            for name in &names {
                black_box(parser.parse_sample(black_box(name)));
            }
        })
    });
    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for size in [100, 1_000, 10_000, 100_000] {
        let latencies = create_sample_latencies(size);

        group.bench_with_input(BenchmarkId::new("filter_outliers", size), &latencies, |b, values| {
            b.iter(|| filter_outliers(black_box(values), 1.5).unwrap())
        });

        let filtered = filter_outliers(&latencies, 1.5).unwrap();
        group.bench_with_input(BenchmarkId::new("summary", size), &filtered, |b, filtered| {
            b.iter(|| LatencySummary::from_filtered(black_box(filtered)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("histogram_40_bins", size), &filtered.retained, |b, values| {
            b.iter(|| Histogram::from_values(black_box(values), 40).unwrap())
        });
    }

    group.finish();
}

fn benchmark_directory_scan(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    for name in create_sample_names(5_000) {
        File::create(temp.path().join(name)).unwrap();
    }

    c.bench_function("scan_directory_5000_files", |b| {
        b.iter(|| scan_directory(black_box(temp.path())).unwrap())
    });
}

fn benchmark_config_parsing(c: &mut Criterion) {
    c.bench_function("config_parsing", |b| {
        b.iter(|| {
            let cli = Cli::parse_from(["fla", "-d", "a=dir_a", "-d", "b=dir_b", "--bins", "30", "--no-plot"]);
            let config = ConfigParser::new(cli).parse_with_lookup(|_| None).unwrap();
            black_box(config);
        })
    });
}

criterion_group!(
    benches,
    benchmark_filename_parsing,
    benchmark_statistics,
    benchmark_directory_scan,
    benchmark_config_parsing
);

criterion_main!(benches);
