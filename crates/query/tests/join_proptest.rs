//! Property-based tests for the block nested-loop join.
//!
//! The join must emit the left-major cross product whatever the block size.

use proptest::prelude::*;
use shoal_core::schema::{FieldMeta, TableMetaBuilder};
use shoal_core::{AttrType, Value};
use shoal_query::operator::{NestedLoopJoinOperator, PhysicalOperator, TableScanOperator};
use shoal_storage::{ReadWriteMode, Table, Trx};
use std::path::Path;
use std::rc::Rc;

fn create_table(dir: &Path, name: &str, values: &[i32]) -> Rc<Table> {
    let meta = TableMetaBuilder::new(name)
        .unwrap()
        .with_trx_fields()
        .add_field(FieldMeta::new("v", AttrType::Ints))
        .unwrap()
        .build()
        .unwrap();
    let table = Table::create(meta, dir).unwrap();
    let trx = Trx::begin();
    for v in values {
        table.insert_values(&trx, &[Value::Int(*v)]).unwrap();
    }
    table
}

/// Strategy for generating the rows of a single-column table.
fn rows_strategy(max_rows: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-1000i32..1000, 0..max_rows)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: output is the cross product in left-major order.
    #[test]
    fn join_is_left_major_cross_product(
        left in rows_strategy(12),
        right in rows_strategy(8),
        block in 1usize..16,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let l = create_table(dir.path(), "l", &left);
        let r = create_table(dir.path(), "r", &right);

        let children: Vec<Box<dyn PhysicalOperator>> = vec![
            Box::new(TableScanOperator::new(l, ReadWriteMode::ReadOnly)),
            Box::new(TableScanOperator::new(r, ReadWriteMode::ReadOnly)),
        ];
        let mut join = NestedLoopJoinOperator::new(children, block);
        join.open(&Trx::begin()).unwrap();
        let mut pairs = Vec::new();
        while join.next().unwrap() {
            let row = join.current_tuple().unwrap();
            pairs.push((row.cell_at(0).unwrap().get_int(), row.cell_at(1).unwrap().get_int()));
        }
        join.close().unwrap();

        let expected: Vec<(i32, i32)> = left
            .iter()
            .flat_map(|l| right.iter().map(move |r| (*l, *r)))
            .collect();
        prop_assert_eq!(pairs, expected);
    }
}
