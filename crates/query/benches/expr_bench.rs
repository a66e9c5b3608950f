//! Benchmarks for expression evaluation and the nested-loop join.
//!
//! Expression benchmarks compare row-at-a-time evaluation with chunk
//! evaluation of the same tree over the same data.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use shoal_core::schema::{FieldMeta, TableMetaBuilder};
use shoal_core::{AttrType, Value};
use shoal_query::config::ExecutorConfig;
use shoal_query::expr::{ArithmeticExpr, ArithmeticType, CompOp, ComparisonExpr, Expression, FieldExpr};
use shoal_query::operator::{NestedLoopJoinOperator, PhysicalOperator, TableScanOperator};
use shoal_query::tuple::{TupleCellSpec, ValueListTuple};
use shoal_query::{Chunk, Column};
use shoal_storage::{ReadWriteMode, Table, Trx};
use std::rc::Rc;

// ============================================================================
// Data Generation Utilities
// ============================================================================

/// Simple LCG so runs see the same data
fn pseudo_random(count: usize, seed: u64) -> Vec<i32> {
    let mut s = seed;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((s >> 33) % 10_000) as i32
        })
        .collect()
}

fn bound_field(name: &str, attr_type: AttrType, pos: usize) -> Expression {
    let mut field = FieldExpr::new("t", name, attr_type);
    field.set_pos(pos);
    Expression::Field(field)
}

/// `a * 2 + b`, with `a` INTS and `b` FLOATS
fn arithmetic_tree() -> ArithmeticExpr {
    ArithmeticExpr::new(
        ArithmeticType::Add,
        Expression::Arithmetic(ArithmeticExpr::new(
            ArithmeticType::Mul,
            bound_field("a", AttrType::Ints, 0),
            Some(Expression::value(2)),
        )),
        Some(bound_field("b", AttrType::Floats, 1)),
    )
}

fn build_inputs(size: usize) -> (Chunk, Vec<ValueListTuple>) {
    let ints = pseudo_random(size, 12345);
    let mut a = Column::with_capacity(AttrType::Ints, 4, size);
    let mut b = Column::with_capacity(AttrType::Floats, 4, size);
    let mut tuples = Vec::with_capacity(size);
    for &x in &ints {
        let y = x as f32 / 7.0;
        a.append_value(&Value::Int(x)).unwrap();
        b.append_value(&Value::Float(y)).unwrap();
        tuples.push(ValueListTuple::new(
            vec![Value::Int(x), Value::Float(y)],
            vec![TupleCellSpec::new("t", "a"), TupleCellSpec::new("t", "b")],
        ));
    }
    let mut chunk = Chunk::new();
    chunk.add_column(a);
    chunk.add_column(b);
    (chunk, tuples)
}

// ============================================================================
// Expression Benchmarks
// ============================================================================

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    let expr = arithmetic_tree();

    for size in [1_000, 10_000].iter() {
        let (chunk, tuples) = build_inputs(*size);

        group.bench_with_input(BenchmarkId::new("row", size), size, |b, _| {
            b.iter(|| {
                for tuple in &tuples {
                    black_box(expr.get_value(tuple).unwrap());
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("chunk", size), size, |b, _| {
            b.iter(|| black_box(expr.get_column(&chunk).unwrap()))
        });
    }

    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparison");
    let expr = ComparisonExpr::new(CompOp::LessThan, bound_field("a", AttrType::Ints, 0), Expression::value(5_000));

    for size in [1_000, 10_000].iter() {
        let (chunk, tuples) = build_inputs(*size);

        group.bench_with_input(BenchmarkId::new("row", size), size, |b, _| {
            b.iter(|| tuples.iter().filter(|t| expr.get_value(*t).unwrap().get_boolean()).count())
        });

        group.bench_with_input(BenchmarkId::new("chunk", size), size, |b, _| {
            b.iter_batched(
                Vec::new,
                |mut select| {
                    expr.eval(&chunk, &mut select).unwrap();
                    black_box(select)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// Join Benchmarks
// ============================================================================

fn create_table(dir: &std::path::Path, name: &str, rows: usize) -> Rc<Table> {
    let meta = TableMetaBuilder::new(name)
        .unwrap()
        .with_trx_fields()
        .add_field(FieldMeta::new("id", AttrType::Ints))
        .unwrap()
        .build()
        .unwrap();
    let table = Table::create(meta, dir).unwrap();
    let trx = Trx::begin();
    for id in pseudo_random(rows, 99) {
        table.insert_values(&trx, &[Value::Int(id)]).unwrap();
    }
    table
}

fn bench_nested_loop_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_loop_join");
    let left_dir = tempfile::tempdir().unwrap();
    let right_dir = tempfile::tempdir().unwrap();
    let left = create_table(left_dir.path(), "l", 200);
    let right = create_table(right_dir.path(), "r", 200);

    for block in [1usize, 64].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(block), block, |b, &block| {
            b.iter(|| {
                let config = ExecutorConfig {
                    left_block_size: block,
                    ..ExecutorConfig::default()
                };
                let children: Vec<Box<dyn PhysicalOperator>> = vec![
                    Box::new(TableScanOperator::with_config(left.clone(), ReadWriteMode::ReadOnly, &config)),
                    Box::new(TableScanOperator::with_config(right.clone(), ReadWriteMode::ReadOnly, &config)),
                ];
                let mut join = NestedLoopJoinOperator::with_config(children, &config);
                join.open(&Trx::begin()).unwrap();
                let mut rows = 0usize;
                while join.next().unwrap() {
                    rows += 1;
                }
                join.close().unwrap();
                black_box(rows)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_arithmetic, bench_comparison, bench_nested_loop_join);

criterion_main!(benches);
