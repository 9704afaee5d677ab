//! Performance benchmarks for flybase-remap
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flybase_remap::core::{convert, IntervalTable, ParsedCoordinate};
use flybase_remap::formats::convert_coordinates;
use std::io;

/// Mapping table used for benchmarks
const MAPPING_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/dmel_r5_to_r6.tsv");

/// Benchmark interval table loading
fn bench_table_loading(c: &mut Criterion) {
    c.bench_function("table_load", |b| {
        b.iter(|| {
            let table = IntervalTable::from_mapping_file(black_box(MAPPING_FILE)).unwrap();
            black_box(table)
        })
    });
}

/// Benchmark coordinate parsing
fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_coordinate", |b| {
        b.iter(|| ParsedCoordinate::parse(black_box("Chr3RHet:1,964,215..1,936,890")).unwrap())
    });
}

/// Benchmark single coordinate conversion
fn bench_single_conversion(c: &mut Criterion) {
    let table = IntervalTable::from_mapping_file(MAPPING_FILE).unwrap();
    let point = ParsedCoordinate::parse("3R:3,020,320").unwrap();
    let spanning = ParsedCoordinate::parse("3RHet:1964215..1936890").unwrap();

    c.bench_function("convert_point", |b| {
        b.iter(|| black_box(convert(&table, black_box(&point))))
    });
    c.bench_function("convert_spanning_range", |b| {
        b.iter(|| black_box(convert(&table, black_box(&spanning))))
    });
}

/// Benchmark batch conversion across thread counts
fn bench_batch_conversion(c: &mut Criterion) {
    let table = IntervalTable::from_mapping_file(MAPPING_FILE).unwrap();
    let input: String = (0..100_000)
        .map(|i| format!("4:{}..{}\n", 40_001 + (i % 90_000), 40_101 + (i % 90_000)))
        .collect();

    let mut group = c.benchmark_group("batch_conversion");
    group.throughput(Throughput::Elements(100_000));
    group.sample_size(10);

    for threads in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                convert_coordinates(input.as_bytes(), &mut io::sink(), None, &table, threads).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_table_loading,
    bench_parse,
    bench_single_conversion,
    bench_batch_conversion
);
criterion_main!(benches);
