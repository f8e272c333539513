//! Manifest, version and config parsing performance benchmarks
//!
//! Benchmarks parsing of requirements manifests, version strings and
//! reqlint.toml across different sizes.

use std::str::FromStr;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reqlint_benchmarks::{create_manifest_content, create_version_strings, criterion_config};
use reqlint_config::{default_config_toml, parse_reqlint_toml};
use reqlint_core::types::{Requirement, Version};
use reqlint_manifest::{parse_manifest, parse_manifest_strict};

/// Benchmark lossless manifest parsing
fn bench_manifest_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifest_parsing");
    group.measurement_time(std::time::Duration::from_secs(5));

    for count in [10, 100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let content = create_manifest_content(count);

        group.bench_with_input(BenchmarkId::new("lossless", count), &content, |b, content| {
            b.iter(|| black_box(parse_manifest(content)));
        });

        group.bench_with_input(BenchmarkId::new("strict", count), &content, |b, content| {
            b.iter(|| black_box(parse_manifest_strict(content).is_ok()));
        });
    }

    group.finish();
}

/// Benchmark single requirement and version parsing
fn bench_requirement_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("requirement_parsing");
    let versions = create_version_strings(1_000);

    group.bench_function("version", |b| {
        let mut index = 0;
        b.iter(|| {
            let version = &versions[index % versions.len()];
            index += 1;
            black_box(Version::from_str(version))
        });
    });

    group.bench_function("version_ordering", |b| {
        let parsed: Vec<Version> = versions.iter().filter_map(|v| v.parse().ok()).collect();
        b.iter(|| {
            let mut sorted = parsed.clone();
            sorted.sort();
            black_box(sorted)
        });
    });

    for input in ["streamlit", "pandas==2.2.2", "uvicorn[standard]>=0.29.0", "Zope.Interface == 6.0.post1"] {
        group.bench_with_input(BenchmarkId::new("requirement", input), input, |b, input| {
            b.iter(|| black_box(Requirement::parse(input)));
        });
    }

    group.finish();
}

/// Benchmark reqlint.toml parsing
fn bench_config_parsing(c: &mut Criterion) {
    let content = default_config_toml();

    c.bench_function("reqlint_toml_parsing", |b| {
        b.iter(|| black_box(parse_reqlint_toml(&content).is_ok()));
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_manifest_parsing, bench_requirement_parsing, bench_config_parsing
}
criterion_main!(benches);
