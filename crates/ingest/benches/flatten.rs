//! Benchmarks for the ingestion hot path
//!
//! These benchmarks verify that:
//! 1. Flattening with a reused extractor does not grow per call
//! 2. Pool acquire/release stays cheap
//! 3. Admitted label sets are checked without allocation

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use tell_ingest::{FieldExtractor, Label, LabelLimits, LabelsValidator, Pool};

const LOG_LINE: &[u8] = br#"{"timestamp":"2024-05-01T12:00:00Z","level":"info","message":"request served","http":{"method":"GET","path":"/api/v1/users","status":200,"duration_ms":12.5},"user":{"id":42,"roles":["admin","dev"]},"trace_id":null}"#;

/// Benchmark flattening with a long-lived extractor
fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    group.throughput(Throughput::Bytes(LOG_LINE.len() as u64));

    let mut parser = FieldExtractor::new();
    group.bench_function("reused_extractor", |b| {
        b.iter(|| {
            parser.parse(black_box(LOG_LINE), "").unwrap();
            black_box(parser.len())
        })
    });

    group.bench_function("with_prefix", |b| {
        b.iter(|| {
            parser.parse(black_box(LOG_LINE), "app.").unwrap();
            black_box(parser.len())
        })
    });

    group.finish();
}

/// Benchmark acquiring a pooled extractor per line
fn bench_pooled(c: &mut Criterion) {
    let pool: Pool<FieldExtractor> = Pool::new(4);

    c.bench_function("pooled_parse", |b| {
        b.iter(|| {
            let mut parser = pool.get();
            parser.parse(black_box(LOG_LINE), "").unwrap();
            black_box(parser.len())
        })
    });
}

/// Benchmark the admission check on a typical label set
fn bench_labels(c: &mut Criterion) {
    let validator = LabelsValidator::new(LabelLimits::default());
    let labels: Vec<Label> = (0..12)
        .map(|i| Label::new(format!("label_{i}"), format!("value_{i}")))
        .collect();

    c.bench_function("labels_admitted", |b| {
        b.iter(|| black_box(validator.exceeds(black_box(&labels))))
    });
}

criterion_group!(benches, bench_flatten, bench_pooled, bench_labels);
criterion_main!(benches);
