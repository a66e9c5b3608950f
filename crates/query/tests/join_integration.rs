//! Integration tests for the block nested-loop join over stored tables.

use shoal_core::schema::{FieldMeta, TableMetaBuilder};
use shoal_core::{AttrType, Value};
use shoal_query::expr::{CompOp, ComparisonExpr, Expression};
use shoal_query::operator::{NestedLoopJoinOperator, PhysicalOperator, TableScanOperator};
use shoal_query::config::ExecutorConfig;
use shoal_query::tuple::TupleCellSpec;
use shoal_storage::{ReadWriteMode, Table, Trx};
use std::path::Path;
use std::rc::Rc;

/// Helper to create a table `name(id INT, label CHARS(8))` holding `ids`.
fn create_table(dir: &Path, name: &str, ids: &[i32]) -> Rc<Table> {
    let meta = TableMetaBuilder::new(name)
        .unwrap()
        .with_trx_fields()
        .add_field(FieldMeta::new("id", AttrType::Ints))
        .unwrap()
        .add_field(FieldMeta::new("label", AttrType::Chars).len(8))
        .unwrap()
        .build()
        .unwrap();
    let table = Table::create(meta, dir).unwrap();
    let trx = Trx::begin();
    for id in ids {
        table
            .insert_values(&trx, &[Value::Int(*id), Value::from(format!("{name}{id}").as_str())])
            .unwrap();
    }
    table
}

fn scan(table: &Rc<Table>) -> Box<dyn PhysicalOperator> {
    Box::new(TableScanOperator::with_config(
        table.clone(),
        ReadWriteMode::ReadOnly,
        &ExecutorConfig::default(),
    ))
}

/// Drains an operator, rendering each row.
fn drain(op: &mut dyn PhysicalOperator) -> Vec<String> {
    op.open(&Trx::begin()).unwrap();
    let mut rows = Vec::new();
    while op.next().unwrap() {
        rows.push(op.current_tuple().unwrap().to_string());
    }
    op.close().unwrap();
    rows
}

#[test]
fn test_left_major_output_over_tables() {
    let dir = tempfile::tempdir().unwrap();
    let left = create_table(dir.path(), "l", &[1, 2, 3]);
    let right = create_table(dir.path(), "r", &[1, 2]);

    let mut join = NestedLoopJoinOperator::new(vec![scan(&left), scan(&right)], 3);
    assert_eq!(
        drain(&mut join),
        vec![
            "1, l1, 1, r1",
            "1, l1, 2, r2",
            "2, l2, 1, r1",
            "2, l2, 2, r2",
            "3, l3, 1, r1",
            "3, l3, 2, r2",
        ]
    );
}

#[test]
fn test_block_size_does_not_change_output() {
    let dir = tempfile::tempdir().unwrap();
    let left = create_table(dir.path(), "l", &[1, 2, 3, 4, 5]);
    let right = create_table(dir.path(), "r", &[7, 8, 9]);

    let expected = drain(&mut NestedLoopJoinOperator::with_config(
        vec![scan(&left), scan(&right)],
        &ExecutorConfig::default(),
    ));
    assert_eq!(expected.len(), 15);
    for block in [1, 2, 4] {
        let mut join = NestedLoopJoinOperator::new(vec![scan(&left), scan(&right)], block);
        assert_eq!(drain(&mut join), expected, "block size {block}");
    }
}

#[test]
fn test_three_way_join_resolves_every_table() {
    let dir = tempfile::tempdir().unwrap();
    let a = create_table(dir.path(), "a", &[1, 2]);
    let b = create_table(dir.path(), "b", &[3]);
    let c = create_table(dir.path(), "c", &[4, 5]);

    let inner: Box<dyn PhysicalOperator> = Box::new(NestedLoopJoinOperator::new(vec![scan(&a), scan(&b)], 1));
    let mut join = NestedLoopJoinOperator::new(vec![inner, scan(&c)], 2);

    join.open(&Trx::begin()).unwrap();
    let mut seen = Vec::new();
    while join.next().unwrap() {
        let row = join.current_tuple().unwrap();
        assert_eq!(row.cell_count(), 6);
        let pick = |t: &str| row.find_cell(&TupleCellSpec::new(t, "id")).unwrap().get_int();
        seen.push((pick("a"), pick("b"), pick("c")));
    }
    join.close().unwrap();
    assert_eq!(seen, vec![(1, 3, 4), (1, 3, 5), (2, 3, 4), (2, 3, 5)]);
}

#[test]
fn test_join_with_filtered_children() {
    let dir = tempfile::tempdir().unwrap();
    let left = create_table(dir.path(), "l", &[1, 2, 3]);
    let right = create_table(dir.path(), "r", &[1, 2, 3]);

    let odd_right = Expression::Comparison(ComparisonExpr::new(
        CompOp::NotEqual,
        Expression::field("r", "id", AttrType::Ints),
        Expression::value(2),
    ));
    let right_scan = TableScanOperator::new(right, ReadWriteMode::ReadOnly).with_predicates(vec![odd_right]);
    let mut join = NestedLoopJoinOperator::new(vec![scan(&left), Box::new(right_scan)], 2);
    let rows = drain(&mut join);
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| !r.ends_with("r2")));
}

#[test]
fn test_empty_right_table() {
    let dir = tempfile::tempdir().unwrap();
    let left = create_table(dir.path(), "l", &[1, 2]);
    let right = create_table(dir.path(), "r", &[]);
    let mut join = NestedLoopJoinOperator::new(vec![scan(&left), scan(&right)], 8);
    assert!(drain(&mut join).is_empty());
}
