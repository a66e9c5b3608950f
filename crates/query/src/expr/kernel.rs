//! Vectorized kernels.
//!
//! Every binary kernel comes in four shapes, by which operands are constant
//! columns, so that the inner loops carry no per-element branch.

use super::CompOp;
use crate::chunk::{Column, ColumnData, ColumnKind};
use shoal_core::types::{compare_float, compare_int};
use shoal_core::{AttrType, Error, Result};

pub(crate) fn binary<T: Copy, O, F>(left: &[T], left_const: bool, right: &[T], right_const: bool, f: F) -> Vec<O>
where
    F: Fn(T, T) -> O,
{
    match (left_const, right_const) {
        (true, true) => match (left.first(), right.first()) {
            (Some(&l), Some(&r)) => vec![f(l, r)],
            _ => Vec::new(),
        },
        (true, false) => match left.first() {
            Some(&l) => right.iter().map(|&r| f(l, r)).collect(),
            None => Vec::new(),
        },
        (false, true) => match right.first() {
            Some(&r) => left.iter().map(|&l| f(l, r)).collect(),
            None => Vec::new(),
        },
        (false, false) => left.iter().zip(right).map(|(&l, &r)| f(l, r)).collect(),
    }
}

pub(crate) fn unary<T: Copy, F: Fn(T) -> T>(input: &[T], f: F) -> Vec<T> {
    input.iter().map(|&v| f(v)).collect()
}

/// Checks that two normal columns have the same row count.
pub(crate) fn check_rows(left: &Column, right: &Column) -> Result<()> {
    if !left.is_constant() && !right.is_constant() && left.count() != right.count() {
        return Err(Error::internal(format!(
            "column row counts differ: {} vs {}",
            left.count(),
            right.count()
        )));
    }
    Ok(())
}

/// Refuses columns holding NULLs; those go through the row evaluator.
pub(crate) fn check_no_nulls(column: &Column) -> Result<()> {
    if column.has_nulls() {
        return Err(Error::unimplemented("vectorized evaluation over NULL cells"));
    }
    Ok(())
}

/// FLOATS view of an INTS or FLOATS column.
pub(crate) fn as_floats(column: &Column) -> Result<Vec<f32>> {
    match column.data() {
        ColumnData::Floats(v) => Ok(v.clone()),
        ColumnData::Ints(v) => Ok(v.iter().map(|&i| i as f32).collect()),
        _ => Err(Error::unimplemented(format!(
            "vectorized arithmetic on {}",
            column.attr_type()
        ))),
    }
}

pub(crate) fn result_kind(left: &Column, right: &Column) -> ColumnKind {
    if left.is_constant() && right.is_constant() {
        ColumnKind::Constant
    } else {
        ColumnKind::Normal
    }
}

/// Evaluates `op` over two columns of the same type.
pub(crate) fn compare_columns(op: CompOp, left: &Column, right: &Column) -> Result<Vec<bool>> {
    if left.attr_type() != right.attr_type() {
        tracing::warn!(left = %left.attr_type(), right = %right.attr_type(), "cannot compare columns with different types");
        return Err(Error::internal(format!(
            "cannot compare {} column with {} column",
            left.attr_type(),
            right.attr_type()
        )));
    }
    check_no_nulls(left)?;
    check_no_nulls(right)?;
    check_rows(left, right)?;
    let (lc, rc) = (left.is_constant(), right.is_constant());
    match (left.data(), right.data()) {
        (ColumnData::Ints(l), ColumnData::Ints(r)) => {
            Ok(binary(l, lc, r, rc, |a, b| op.matches(compare_int(a, b))))
        }
        (ColumnData::Floats(l), ColumnData::Floats(r)) => {
            Ok(binary(l, lc, r, rc, |a, b| op.matches(compare_float(a, b))))
        }
        _ => Err(Error::unimplemented(format!(
            "vectorized comparison of {}",
            left.attr_type()
        ))),
    }
}

/// Wraps a boolean result into a column.
pub(crate) fn bool_column(kind: ColumnKind, values: Vec<bool>) -> Column {
    Column::from_data(AttrType::Booleans, 1, kind, ColumnData::Bools(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_shapes() {
        let add = |a: i32, b: i32| a + b;
        assert_eq!(binary(&[1], true, &[2], true, add), vec![3]);
        assert_eq!(binary(&[1], true, &[2, 3], false, add), vec![3, 4]);
        assert_eq!(binary(&[2, 3], false, &[1], true, add), vec![3, 4]);
        assert_eq!(binary(&[2, 3], false, &[1, 1], false, add), vec![3, 4]);
    }

    #[test]
    fn test_compare_columns_type_mismatch() {
        let ints = Column::constant(&shoal_core::Value::Int(1));
        let floats = Column::constant(&shoal_core::Value::Float(1.0));
        let err = compare_columns(CompOp::EqualTo, &ints, &floats).unwrap_err();
        assert_eq!(err.rc(), shoal_core::Rc::Internal);
    }
}
