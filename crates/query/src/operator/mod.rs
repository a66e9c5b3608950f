//! Pull-based physical operators.
//!
//! Every operator follows the same protocol:
//!
//! ```text
//! open(trx) -> next() ... next() == Ok(false) -> close()
//! ```
//!
//! `current_tuple()` is only meaningful between a `next()` that returned
//! `Ok(true)` and the following call on the operator. An operator that was
//! opened must be closed exactly once, children included, also when `open` or
//! `next` failed.

mod index_scan;
mod nested_loop_join;
mod table_scan;
mod update;
mod vector_index_scan;

pub use index_scan::IndexScanOperator;
pub use nested_loop_join::NestedLoopJoinOperator;
pub use table_scan::TableScanOperator;
pub use update::UpdateOperator;
pub use vector_index_scan::VectorIndexScanOperator;

use crate::tuple::{Tuple, ValueListTuple};
use shoal_core::{Result, Rid};
use shoal_storage::{Table, Trx};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    TableScan,
    IndexScan,
    NestedLoopJoin,
    Update,
    VectorIndexScan,
}

/// A physical operator.
pub trait PhysicalOperator {
    fn kind(&self) -> OperatorKind;

    fn open(&mut self, trx: &Trx) -> Result<()>;

    /// Advances to the next row. `Ok(false)` is end of data.
    fn next(&mut self) -> Result<bool>;

    fn close(&mut self) -> Result<()>;

    /// The row produced by the last successful `next`.
    fn current_tuple(&self) -> Option<Box<dyn Tuple + '_>>;
}

/// Inserts a copy of `tuple` into `table`, stamped with `trx`.
///
/// Any tuple works, including one read from another table or a view, as long
/// as its cells line up with the table's user fields.
pub fn insert_tuple(table: &Table, trx: &Trx, tuple: &dyn Tuple) -> Result<Rid> {
    let values = ValueListTuple::make(tuple)?.into_cells();
    table.insert_values(trx, &values)
}
