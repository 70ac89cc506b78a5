use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lunar_elongation::ephemeris::{AnalyticEphemeris, EphemerisOracle};
use lunar_elongation::services::{bin_elongations, combine_distributions, Sampler};

fn bench_binning(c: &mut Criterion) {
    let mut group = c.benchmark_group("binning");

    for size in [1_000usize, 100_000] {
        let samples: Vec<f64> = (0..size).map(|i| (i as f64 * 12.190749) % 360.0).collect();
        group.bench_with_input(BenchmarkId::new("bin_elongations", size), &samples, |b, input| {
            b.iter(|| bin_elongations(black_box(input)));
        });
    }

    let distributions: Vec<_> = (0..20)
        .map(|k| {
            let samples: Vec<f64> = (0..5_000).map(|i| ((i * (k + 1)) % 360) as f64).collect();
            bin_elongations(&samples).unwrap()
        })
        .collect();
    group.bench_function("combine_20", |b| {
        b.iter(|| combine_distributions(black_box(&distributions)));
    });

    group.finish();
}

fn bench_ephemeris(c: &mut Criterion) {
    let mut group = c.benchmark_group("ephemeris");
    let oracle = AnalyticEphemeris::new();

    // Hourly over 30 days from 2000-01-01T12:00Z
    let instants: Vec<f64> = (0..720).map(|i| 946_728_000.0 + i as f64 * 3600.0).collect();
    group.bench_function("ecliptic_longitudes_720", |b| {
        b.iter(|| oracle.ecliptic_longitudes(black_box(&instants)));
    });

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    group.sample_size(20);

    let sampler = Sampler::with_defaults(AnalyticEphemeris::new());
    let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    group.bench_function("one_year_hourly", |b| {
        b.iter(|| sampler.sample(black_box(&start), 1.0, 60));
    });

    group.finish();
}

criterion_group!(benches, bench_binning, bench_ephemeris, bench_sampling);
criterion_main!(benches);
