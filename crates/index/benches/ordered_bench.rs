//! Benchmarks for shoal-index using criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shoal_core::{Rid, Value};
use shoal_index::{DistanceMetric, FlatVectorIndex, IndexKey, KeyRange, OrderedIndex, VectorIndex};

fn ordered_insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut index = OrderedIndex::new("bench", false);
                for i in 0..size {
                    index
                        .insert_entry(IndexKey::new(vec![Value::Int(i)]), Rid::new(0, i as u32))
                        .unwrap();
                }
                black_box(index)
            });
        });
    }

    group.finish();
}

fn ordered_range_benchmark(c: &mut Criterion) {
    let mut index = OrderedIndex::new("bench", false);
    for i in 0..10000 {
        index.insert_entry(i, Rid::new(0, i as u32)).unwrap();
    }

    c.bench_function("ordered_range_1000", |b| {
        b.iter(|| black_box(index.scan(&KeyRange::from_parts(Some((4000, true)), Some((5000, false))))));
    });
}

fn flat_query_benchmark(c: &mut Criterion) {
    let dir = std::env::temp_dir().join("shoal-bench.idx");
    let mut index = FlatVectorIndex::create(dir, 16, DistanceMetric::L2).unwrap();
    for i in 0..5000u32 {
        let v: Vec<f32> = (0..16).map(|d| ((i * 31 + d) % 97) as f32).collect();
        index.insert(Rid::new(0, i), &v).unwrap();
    }
    let query = vec![1.0f32; 16];

    c.bench_function("flat_query_top10", |b| {
        b.iter(|| black_box(index.query(&query, 10).unwrap()));
    });
}

criterion_group!(
    benches,
    ordered_insert_benchmark,
    ordered_range_benchmark,
    flat_query_benchmark
);
criterion_main!(benches);
