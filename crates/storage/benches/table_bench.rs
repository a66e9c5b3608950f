//! Benchmarks for table inserts and scans.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shoal_core::schema::{FieldMeta, TableMetaBuilder, TableMeta};
use shoal_core::{AttrType, Record, Value};
use shoal_storage::{ReadWriteMode, Table, Trx};
use std::rc::Rc;

fn test_meta() -> TableMeta {
    TableMetaBuilder::new("test")
        .unwrap()
        .with_trx_fields()
        .add_field(FieldMeta::new("id", AttrType::Ints))
        .unwrap()
        .add_field(FieldMeta::new("price", AttrType::Floats))
        .unwrap()
        .add_field(FieldMeta::new("sector", AttrType::Chars).len(8))
        .unwrap()
        .build()
        .unwrap()
}

fn populate(table: &Table, trx: &Trx, count: i32) {
    let sectors = ["Tech", "Finance", "Health", "Energy", "Consumer"];
    for i in 0..count {
        table
            .insert_values(
                trx,
                &[
                    Value::Int(i),
                    Value::Float(100.0 + i as f32 * 0.1),
                    Value::from(sectors[i as usize % sectors.len()]),
                ],
            )
            .unwrap();
    }
}

fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let dir = tempfile::tempdir().unwrap();
                let table = Table::create(test_meta(), dir.path()).unwrap();
                table.create_index("idx_id", &["id"], true).unwrap();
                populate(&table, &Trx::begin(), size);
                black_box(table.record_count())
            });
        });
    }

    group.finish();
}

fn scan_benchmark(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let table: Rc<Table> = Table::create(test_meta(), dir.path()).unwrap();
    let trx = Trx::begin();
    populate(&table, &trx, 10000);

    c.bench_function("table_scan_10000", |b| {
        b.iter(|| {
            let mut scanner = table.get_record_scanner(&trx, ReadWriteMode::ReadOnly).unwrap();
            let mut record = Record::default();
            let mut n = 0;
            while scanner.next(&mut record).unwrap() {
                n += 1;
            }
            scanner.close();
            black_box(n)
        });
    });
}

criterion_group!(benches, insert_benchmark, scan_benchmark);
criterion_main!(benches);
