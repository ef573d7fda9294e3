//! Benchmarks for divider-arff decode and encode.
//!
//! Run with: cargo bench -p divider-arff
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p divider-arff -- --save-baseline main
//! 2. After changes: cargo bench -p divider-arff -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use divider_arff::{decode_str, encode, infer_attributes, DecodeParams, EncodeParams};
use divider_types::{Table, TableBuilder, Value};

// =============================================================================
// Test Data Generation
// =============================================================================

/// An iris-shaped table: four measurements, a species label and a free-text note.
fn create_table(rows: usize) -> Table {
    const SPECIES: [&str; 3] = ["setosa", "versicolor", "virginica"];

    let mut builder = TableBuilder::new([
        "sepal_length",
        "sepal_width",
        "petal_length",
        "petal_width",
        "species",
        "note",
    ]);
    for i in 0..rows {
        #[allow(clippy::cast_precision_loss)]
        let base = (i % 50) as f64 / 10.0;
        let note = if i % 7 == 0 {
            Value::Null
        } else {
            Value::from(format!("sample {i}, batch {}", i / 100))
        };
        builder.push_row(vec![
            Value::from(4.0 + base),
            Value::from(2.0 + base / 2.0),
            Value::from(1.0 + base),
            Value::from(0.1 + base / 5.0),
            Value::from(SPECIES[i % SPECIES.len()]),
            note,
        ]);
    }
    builder.build().expect("benchmark table is well-formed")
}

// =============================================================================
// Codec Benchmarks
// =============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("Codec");

    for rows in [1_000, 10_000] {
        let table = create_table(rows);
        let params = EncodeParams::default();
        let text = encode(&table, "bench", &params).expect("failed to encode");

        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("infer", rows), &table, |b, t| {
            b.iter(|| infer_attributes(black_box(t), &params));
        });
        group.bench_with_input(BenchmarkId::new("encode", rows), &table, |b, t| {
            b.iter(|| encode(black_box(t), "bench", &params));
        });
        group.bench_with_input(BenchmarkId::new("decode", rows), &text, |b, s| {
            b.iter(|| decode_str(black_box(s), &DecodeParams::default()));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_codec);
criterion_main!(benches);
